//! # API Handler
//!
//! JSON method dispatch over `RecordLedgerApi` for front ends that speak
//! JSON-RPC style requests.
//!
//! ```text
//! Front end → handle_api_query(method, params) → ApiGatewayHandler → RecordLedgerApi
//! ```
//!
//! Projections (`list_records` filtering, `get_stats`, `get_histogram`) are
//! computed from a fresh hydration on every call.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::domain::{
    histogram_by_drug, projections, LedgerError, LedgerErrorKind, Record, RecordDraft, RecordId,
    SimulationResult, StatusSummary,
};
use crate::ports::inbound::RecordLedgerApi;

/// Error returned to the caller of `handle_api_query`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiQueryError {
    pub code: i32,
    pub message: String,
    /// Ledger error kind, when the failure came from the ledger.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<LedgerErrorKind>,
}

impl ApiQueryError {
    pub fn method_not_found(method: &str) -> Self {
        Self {
            code: -32601,
            message: format!("Method not found: {}", method),
            kind: None,
        }
    }

    pub fn invalid_params(msg: &str) -> Self {
        Self {
            code: -32602,
            message: msg.to_string(),
            kind: None,
        }
    }

    pub fn internal(msg: &str) -> Self {
        Self {
            code: -32603,
            message: msg.to_string(),
            kind: None,
        }
    }
}

impl From<serde_json::Error> for ApiQueryError {
    fn from(err: serde_json::Error) -> Self {
        Self::internal(&format!("Response serialization failed: {}", err))
    }
}

impl From<LedgerError> for ApiQueryError {
    fn from(err: LedgerError) -> Self {
        let kind = err.kind();
        let code = match kind {
            LedgerErrorKind::Unauthenticated => -32001,
            LedgerErrorKind::UserCancelled => -32002,
            LedgerErrorKind::NotFound => -32003,
            LedgerErrorKind::InvalidState => -32004,
            LedgerErrorKind::SerializationError => -32005,
            LedgerErrorKind::LedgerUnavailable => -32006,
            LedgerErrorKind::StoreFailure => -32007,
            LedgerErrorKind::ExternalProviderError => -32008,
        };
        Self {
            code,
            message: err.to_string(),
            kind: Some(kind),
        }
    }
}

impl std::fmt::Display for ApiQueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiQueryError {}

/// Record as returned to API callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordView {
    pub id: String,
    pub patient_id: String,
    pub drug_name: String,
    pub dosage: String,
    pub encrypted_data: String,
    pub timestamp: u64,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub simulation_results: Option<SimulationResult>,
}

impl From<&Record> for RecordView {
    fn from(record: &Record) -> Self {
        Self {
            id: record.id.to_string(),
            patient_id: record.patient_id.clone(),
            drug_name: record.drug_name.clone(),
            dosage: record.dosage.clone(),
            encrypted_data: record.encrypted_payload.clone(),
            timestamp: record.created_at,
            status: record.status.to_string(),
            simulation_results: record.simulation_result.clone(),
        }
    }
}

/// Handler translating JSON requests into `RecordLedgerApi` calls.
pub struct ApiGatewayHandler<A> {
    api: Arc<A>,
}

impl<A: RecordLedgerApi> ApiGatewayHandler<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    /// Health check.
    pub fn handle_ping(&self) -> Value {
        json!({
            "status": "ok",
            "subsystem": "ddt-01-record-ledger"
        })
    }

    /// Hydrated records, optionally filtered by `term`.
    pub async fn handle_list_records(&self, term: Option<&str>) -> Result<Value, ApiQueryError> {
        let snapshot = self.api.load_all().await?;
        let views: Vec<RecordView> = match term {
            Some(term) => projections::filter(&snapshot, term)
                .into_iter()
                .map(RecordView::from)
                .collect(),
            None => snapshot.iter().map(RecordView::from).collect(),
        };
        Ok(json!({ "records": views }))
    }

    /// Single record, `null` if unknown.
    pub async fn handle_get_record(&self, id: &RecordId) -> Result<Value, ApiQueryError> {
        let record = self.api.get_record(id).await?;
        Ok(json!({ "record": record.as_ref().map(RecordView::from) }))
    }

    /// Status totals.
    pub async fn handle_get_stats(&self) -> Result<Value, ApiQueryError> {
        let snapshot = self.api.load_all().await?;
        Ok(serde_json::to_value(StatusSummary::from_snapshot(&snapshot))?)
    }

    /// Distribution by drug name.
    pub async fn handle_get_histogram(&self) -> Result<Value, ApiQueryError> {
        let snapshot = self.api.load_all().await?;
        Ok(serde_json::to_value(histogram_by_drug(&snapshot))?)
    }

    pub async fn handle_create_record(&self, draft: RecordDraft) -> Result<Value, ApiQueryError> {
        let record = self.api.create_record(draft).await?;
        Ok(json!({ "record": RecordView::from(&record) }))
    }

    pub async fn handle_run_simulation(&self, id: &RecordId) -> Result<Value, ApiQueryError> {
        let record = self.api.run_simulation(id).await?;
        Ok(json!({ "record": RecordView::from(&record) }))
    }

    pub async fn handle_reject_record(&self, id: &RecordId) -> Result<Value, ApiQueryError> {
        let record = self.api.reject_record(id).await?;
        Ok(json!({ "record": RecordView::from(&record) }))
    }

    pub async fn handle_reconcile(&self) -> Result<Value, ApiQueryError> {
        let report = self.api.reconcile_index().await?;
        Ok(serde_json::to_value(report)?)
    }
}

/// Handle a JSON query.
///
/// ## Supported Methods
///
/// - `ping`: Health check
/// - `list_records`: Newest-first records, optional `term` filter
/// - `get_record`: Record by `id`
/// - `get_stats`: Status totals
/// - `get_histogram`: Distribution by drug name
/// - `create_record`: `patientId`, `drugName`, `dosage`, `medicalHistory`
/// - `run_simulation`: Simulate record `id`
/// - `reject_record`: Reject record `id`
/// - `reconcile_index`: Re-append locally created ids
pub async fn handle_api_query<A: RecordLedgerApi>(
    handler: &ApiGatewayHandler<A>,
    method: &str,
    params: &Value,
) -> Result<Value, ApiQueryError> {
    match method {
        "ping" => Ok(handler.handle_ping()),
        "list_records" => {
            let term = params.get("term").and_then(Value::as_str);
            handler.handle_list_records(term).await
        }
        "get_record" => handler.handle_get_record(&parse_id_param(params)?).await,
        "get_stats" => handler.handle_get_stats().await,
        "get_histogram" => handler.handle_get_histogram().await,
        "create_record" => handler.handle_create_record(parse_draft(params)?).await,
        "run_simulation" => handler.handle_run_simulation(&parse_id_param(params)?).await,
        "reject_record" => handler.handle_reject_record(&parse_id_param(params)?).await,
        "reconcile_index" => handler.handle_reconcile().await,
        _ => Err(ApiQueryError::method_not_found(method)),
    }
}

fn parse_id_param(params: &Value) -> Result<RecordId, ApiQueryError> {
    params
        .get("id")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(RecordId::from)
        .ok_or_else(|| ApiQueryError::invalid_params("Missing id parameter"))
}

fn parse_draft(params: &Value) -> Result<RecordDraft, ApiQueryError> {
    let field = |name: &str| -> Result<String, ApiQueryError> {
        params
            .get(name)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ApiQueryError::invalid_params(&format!("Missing {} parameter", name)))
    };

    Ok(RecordDraft {
        patient_id: field("patientId")?,
        drug_name: field("drugName")?,
        dosage: field("dosage")?,
        medical_history: params
            .get("medicalHistory")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
    })
}
