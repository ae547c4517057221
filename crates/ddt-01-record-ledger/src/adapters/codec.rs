//! # JSON Record Codec
//!
//! Persisted layout shared with the web front end:
//!
//! ```text
//! <index key>      → ["<id>", "<id>", ...]
//! <prefix><id>     → {"patientId", "drugName", "dosage", "data",
//!                     "timestamp", "status", "simulationResults"?}
//! ```
//!
//! `simulationResults` holds the result object as a JSON-encoded string and
//! is only valid on an `optimized` record. A missing `status` decodes as
//! `pending`.

use serde::{Deserialize, Serialize};

use crate::domain::{CodecError, Record, RecordId, RecordStatus, SimulationResult, Timestamp};
use crate::ports::outbound::RecordCodec;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredRecord {
    patient_id: String,
    drug_name: String,
    dosage: String,
    data: String,
    timestamp: Timestamp,
    #[serde(default)]
    status: RecordStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    simulation_results: Option<String>,
}

/// Default codec using `serde_json`.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonRecordCodec;

impl RecordCodec for JsonRecordCodec {
    fn encode_index(&self, ids: &[RecordId]) -> Result<Vec<u8>, CodecError> {
        Ok(serde_json::to_vec(ids)?)
    }

    fn decode_index(&self, bytes: &[u8]) -> Result<Vec<RecordId>, CodecError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    fn encode_record(&self, record: &Record) -> Result<Vec<u8>, CodecError> {
        let simulation_results = record
            .simulation_result
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let stored = StoredRecord {
            patient_id: record.patient_id.clone(),
            drug_name: record.drug_name.clone(),
            dosage: record.dosage.clone(),
            data: record.encrypted_payload.clone(),
            timestamp: record.created_at,
            status: record.status,
            simulation_results,
        };
        Ok(serde_json::to_vec(&stored)?)
    }

    fn decode_record(&self, id: &RecordId, bytes: &[u8]) -> Result<Record, CodecError> {
        let stored: StoredRecord = serde_json::from_slice(bytes)?;

        let simulation_result = stored
            .simulation_results
            .as_deref()
            .map(serde_json::from_str::<SimulationResult>)
            .transpose()
            .map_err(|e| CodecError::new(format!("simulationResults: {e}")))?;

        if simulation_result.is_some() && stored.status != RecordStatus::Optimized {
            return Err(CodecError::new(format!(
                "simulationResults present on a {} record",
                stored.status
            )));
        }

        Ok(Record {
            id: id.clone(),
            patient_id: stored.patient_id,
            drug_name: stored.drug_name,
            dosage: stored.dosage,
            encrypted_payload: stored.data,
            created_at: stored.timestamp,
            status: stored.status,
            simulation_result,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn optimized() -> Record {
        Record {
            id: RecordId::from("r1"),
            patient_id: "PT-9".into(),
            drug_name: "Aspirin".into(),
            dosage: "100mg".into(),
            encrypted_payload: "FHE-7b7d".into(),
            created_at: 1_700_000_000,
            status: RecordStatus::Optimized,
            simulation_result: Some(SimulationResult {
                optimal_dosage: "2.10mg".into(),
                delivery_route: "IV".into(),
                time_to_peak: "3.20 hours".into(),
                efficacy: "81%".into(),
            }),
        }
    }

    #[test]
    fn test_record_round_trip() {
        let codec = JsonRecordCodec;
        let record = optimized();
        let bytes = codec.encode_record(&record).unwrap();
        assert_eq!(codec.decode_record(&record.id, &bytes).unwrap(), record);
    }

    #[test]
    fn test_wire_shape_matches_front_end() {
        let bytes = JsonRecordCodec.encode_record(&optimized()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(value["drugName"], "Aspirin");
        assert_eq!(value["data"], "FHE-7b7d");
        assert_eq!(value["timestamp"], 1_700_000_000u64);
        assert_eq!(value["status"], "optimized");
        let nested: serde_json::Value =
            serde_json::from_str(value["simulationResults"].as_str().unwrap()).unwrap();
        assert_eq!(nested["deliveryRoute"], "IV");
        assert!(value.get("id").is_none());
    }

    #[test]
    fn test_missing_status_defaults_to_pending() {
        let raw = br#"{"patientId":"p","drugName":"d","dosage":"1","data":"x","timestamp":5}"#;
        let record = JsonRecordCodec.decode_record(&RecordId::from("a"), raw).unwrap();
        assert_eq!(record.status, RecordStatus::Pending);
        assert!(record.simulation_result.is_none());
    }

    #[test]
    fn test_malformed_payloads_are_errors() {
        let codec = JsonRecordCodec;
        assert!(codec.decode_record(&RecordId::from("a"), b"not json").is_err());

        let bad_result = br#"{"patientId":"p","drugName":"d","dosage":"1","data":"x",
            "timestamp":5,"status":"optimized","simulationResults":"{oops"}"#;
        assert!(codec.decode_record(&RecordId::from("a"), bad_result).is_err());
    }

    #[test]
    fn test_result_on_non_optimized_record_is_rejected() {
        let codec = JsonRecordCodec;
        let result = r#"{\"optimalDosage\":\"1mg\",\"deliveryRoute\":\"IV\",\"timeToPeak\":\"1 hours\",\"efficacy\":\"50%\"}"#;

        for status in ["pending", "rejected"] {
            let raw = format!(
                r#"{{"patientId":"p","drugName":"d","dosage":"1","data":"x","timestamp":5,"status":"{status}","simulationResults":"{result}"}}"#
            );
            let err = codec
                .decode_record(&RecordId::from("a"), raw.as_bytes())
                .unwrap_err();
            assert!(err.message.contains(status), "{}", err.message);
        }

        let no_status = format!(
            r#"{{"patientId":"p","drugName":"d","dosage":"1","data":"x","timestamp":5,"simulationResults":"{result}"}}"#
        );
        assert!(codec.decode_record(&RecordId::from("a"), no_status.as_bytes()).is_err());
    }

    #[test]
    fn test_index_round_trip_preserves_order() {
        let ids = vec![RecordId::from("b"), RecordId::from("a"), RecordId::from("c")];
        let bytes = JsonRecordCodec.encode_index(&ids).unwrap();
        assert_eq!(bytes, br#"["b","a","c"]"#);
        assert_eq!(JsonRecordCodec.decode_index(&bytes).unwrap(), ids);
    }
}
