//! # Projections
//!
//! Read-only views derived from a hydrated snapshot. Nothing here reads the
//! ledger; callers refresh the snapshot and recompute.

use serde::Serialize;
use std::collections::HashMap;

use super::entities::{Record, RecordStatus};

/// Records whose `drug_name` or `patient_id` contains `term`, ignoring case.
///
/// Snapshot order is preserved. An empty term matches everything.
pub fn filter<'a>(snapshot: &'a [Record], term: &str) -> Vec<&'a Record> {
    let needle = term.to_lowercase();
    snapshot
        .iter()
        .filter(|r| {
            r.drug_name.to_lowercase().contains(&needle)
                || r.patient_id.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Number of records in `status`.
pub fn count_by_status(snapshot: &[Record], status: RecordStatus) -> usize {
    snapshot.iter().filter(|r| r.status == status).count()
}

/// Per-status totals for the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSummary {
    pub total: usize,
    pub pending: usize,
    pub optimized: usize,
    pub rejected: usize,
}

impl StatusSummary {
    /// Tally a snapshot in one pass.
    pub fn from_snapshot(snapshot: &[Record]) -> Self {
        snapshot.iter().fold(Self::default(), |mut acc, r| {
            acc.total += 1;
            match r.status {
                RecordStatus::Pending => acc.pending += 1,
                RecordStatus::Optimized => acc.optimized += 1,
                RecordStatus::Rejected => acc.rejected += 1,
            }
            acc
        })
    }
}

/// One bar of the drug distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrugCount {
    pub drug_name: String,
    pub count: usize,
}

/// Record count per drug name.
///
/// Entries keep the order in which each drug first appears in the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrugHistogram {
    entries: Vec<DrugCount>,
    /// Largest count, never below 1 so ratios are always defined.
    max_count: usize,
}

impl DrugHistogram {
    /// Bars in first-appearance order.
    pub fn entries(&self) -> &[DrugCount] {
        &self.entries
    }

    /// Largest bar (1 for an empty histogram).
    pub fn max_count(&self) -> usize {
        self.max_count
    }

    /// Count for one drug, if present.
    pub fn get(&self, drug_name: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|e| e.drug_name == drug_name)
            .map(|e| e.count)
    }

    /// Bar width in `[0, 1]` relative to the largest bar.
    pub fn ratio(&self, drug_name: &str) -> f64 {
        self.get(drug_name)
            .map_or(0.0, |c| c as f64 / self.max_count as f64)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Distribution of records by drug name.
pub fn histogram_by_drug(snapshot: &[Record]) -> DrugHistogram {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut entries: Vec<DrugCount> = Vec::new();

    for record in snapshot {
        match positions.get(record.drug_name.as_str()) {
            Some(&pos) => entries[pos].count += 1,
            None => {
                positions.insert(record.drug_name.as_str(), entries.len());
                entries.push(DrugCount {
                    drug_name: record.drug_name.clone(),
                    count: 1,
                });
            }
        }
    }

    let max_count = entries.iter().map(|e| e.count).max().unwrap_or(0).max(1);
    DrugHistogram { entries, max_count }
}
