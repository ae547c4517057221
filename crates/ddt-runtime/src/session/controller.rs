//! # Session Controller
//!
//! Single owner of the session state. Every command goes through
//! [`SessionController::execute`]; the core service holds no view state.
//!
//! A successful mutation refreshes the snapshot. A failed one sets an error
//! banner and leaves the snapshot as it was.

use std::fmt::Write as _;

use ddt_01_record_ledger::adapters::handle_api_query;
use ddt_01_record_ledger::{
    histogram_by_drug, LedgerError, Record, RecordLedgerApi, StatusSummary,
};
use tracing::{debug, warn};

use super::command::{parse, Command, HELP_TEXT};
use super::state::{Banner, SessionState};
use crate::container::SessionContainer;

const CHART_WIDTH: usize = 30;

pub struct SessionController {
    container: SessionContainer,
    state: SessionState,
}

impl SessionController {
    pub fn new(container: SessionContainer) -> Self {
        let state = SessionState::new(container.wallet.account());
        Self { container, state }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn container(&self) -> &SessionContainer {
        &self.container
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    /// Parse and execute one input line, returning the text to print.
    pub async fn handle_line(&mut self, line: &str) -> String {
        match parse(line) {
            Ok(command) => self.execute(command).await,
            Err(e) => e.to_string(),
        }
    }

    pub async fn execute(&mut self, command: Command) -> String {
        debug!(?command, "Executing session command");
        match command {
            Command::Connect(account) => {
                self.container.wallet.connect(account.clone());
                self.state.account = Some(account.clone());
                format!("connected {account}")
            }
            Command::Disconnect => {
                self.container.wallet.disconnect();
                self.state.account = None;
                "disconnected".to_string()
            }
            Command::Submit(draft) => {
                let outcome = self.container.service.create_record(draft).await;
                self.finish_mutation(outcome, "submitted").await
            }
            Command::Simulate(id) => {
                let outcome = self.container.service.run_simulation(&id).await;
                self.finish_mutation(outcome, "optimized").await
            }
            Command::Reject(id) => {
                let outcome = self.container.service.reject_record(&id).await;
                self.finish_mutation(outcome, "rejected").await
            }
            Command::Refresh => match self.refresh().await {
                Ok(count) => format!("{count} records loaded"),
                Err(e) => format!("refresh failed: {e}"),
            },
            Command::Search(term) => {
                self.state.search_term = term;
                self.render_list()
            }
            Command::List => self.render_list(),
            Command::Show(id) => match self.state.find(id.as_str()) {
                Some(record) => render_record(record),
                None => match self.container.service.get_record(&id).await {
                    Ok(Some(record)) => render_record(&record),
                    Ok(None) => format!("record {id} not found"),
                    Err(e) => format!("lookup failed: {e}"),
                },
            },
            Command::Stats => {
                let summary = StatusSummary::from_snapshot(&self.state.snapshot);
                format!(
                    "total {}  pending {}  optimized {}  rejected {}",
                    summary.total, summary.pending, summary.optimized, summary.rejected
                )
            }
            Command::Chart => self.render_chart(),
            Command::Reconcile => match self.container.service.reconcile_index().await {
                Ok(report) => {
                    let mut out = format!(
                        "checked {}  reappended {}  missing payload {}",
                        report.checked,
                        report.reappended.len(),
                        report.missing_payload.len()
                    );
                    if !report.reappended.is_empty() {
                        if let Err(e) = self.refresh().await {
                            let _ = write!(out, "\nrefresh failed: {e}");
                        }
                    }
                    out
                }
                Err(e) => {
                    self.state.banner = Some(Banner::error(e.to_string()));
                    self.banner_text()
                }
            },
            Command::Rpc { method, params } => {
                match handle_api_query(&self.container.api, &method, &params).await {
                    Ok(value) => serde_json::to_string_pretty(&value)
                        .unwrap_or_else(|e| format!("unprintable response: {e}")),
                    Err(e) => format!("rpc error {}: {}", e.code, e.message),
                }
            }
            Command::Help => HELP_TEXT.to_string(),
            Command::Quit => {
                self.state.running = false;
                "bye".to_string()
            }
        }
    }

    /// Reload the snapshot. On failure the previous snapshot is kept.
    pub async fn refresh(&mut self) -> Result<usize, LedgerError> {
        let snapshot = self.container.service.load_all().await.inspect_err(|e| {
            warn!(error = %e, "Snapshot refresh failed");
        })?;
        self.state.snapshot = snapshot;
        Ok(self.state.snapshot.len())
    }

    async fn finish_mutation(
        &mut self,
        outcome: Result<Record, LedgerError>,
        verb: &str,
    ) -> String {
        match outcome {
            Ok(record) => {
                self.state.banner = Some(Banner::success(format!("record {} {verb}", record.id)));
                if let Err(e) = self.refresh().await {
                    return format!("{}\nrefresh failed: {e}", self.banner_text());
                }
            }
            Err(e) => {
                self.state.banner = Some(Banner::error(format!("{:?}: {e}", e.kind())));
            }
        }
        self.banner_text()
    }

    fn banner_text(&self) -> String {
        self.state
            .banner
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    fn render_list(&self) -> String {
        let visible = self.state.visible();
        if visible.is_empty() {
            return "no records".to_string();
        }
        let mut out = String::new();
        for record in visible {
            let _ = writeln!(
                out,
                "{:<24} {:<12} {:<16} {:<10} {}",
                record.id.as_str(),
                record.patient_id,
                record.drug_name,
                record.dosage,
                record.status.as_str()
            );
        }
        out.trim_end().to_string()
    }

    fn render_chart(&self) -> String {
        let histogram = histogram_by_drug(&self.state.snapshot);
        if histogram.is_empty() {
            return "no records".to_string();
        }
        let mut out = String::new();
        for entry in histogram.entries() {
            let bar = (histogram.ratio(&entry.drug_name) * CHART_WIDTH as f64).round() as usize;
            let _ = writeln!(
                out,
                "{:<16} {:<pad$} {}",
                entry.drug_name,
                "#".repeat(bar.max(1)),
                entry.count,
                pad = CHART_WIDTH
            );
        }
        out.trim_end().to_string()
    }
}

fn render_record(record: &Record) -> String {
    let mut out = format!(
        "id        {}\npatient   {}\ndrug      {}\ndosage    {}\nstatus    {}\ncreated   {}",
        record.id,
        record.patient_id,
        record.drug_name,
        record.dosage,
        record.status.as_str(),
        record.created_at
    );
    if let Some(result) = &record.simulation_result {
        let _ = write!(
            out,
            "\noptimal   {}\nroute     {}\npeak      {}\nefficacy  {}",
            result.optimal_dosage, result.delivery_route, result.time_to_peak, result.efficacy
        );
    }
    out
}
