//! Application state owned by the session controller.

use ddt_01_record_ledger::{filter, Record};

/// Outcome shown after the last ledger transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
}

/// Transaction banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
}

impl Banner {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Error,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Banner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            BannerKind::Success => write!(f, "[ok] {}", self.message),
            BannerKind::Error => write!(f, "[error] {}", self.message),
        }
    }
}

/// Main session model.
#[derive(Debug, Default)]
pub struct SessionState {
    /// Connected wallet account.
    pub account: Option<String>,
    /// Records from the last successful refresh, newest first.
    pub snapshot: Vec<Record>,
    /// Current search term (empty shows everything).
    pub search_term: String,
    /// Result of the last mutation.
    pub banner: Option<Banner>,
    /// Cleared by `quit`.
    pub running: bool,
}

impl SessionState {
    pub fn new(account: Option<String>) -> Self {
        Self {
            account,
            running: true,
            ..Self::default()
        }
    }

    /// Snapshot narrowed by the search term.
    pub fn visible(&self) -> Vec<&Record> {
        filter(&self.snapshot, &self.search_term)
    }

    /// Record from the snapshot by id.
    pub fn find(&self, id: &str) -> Option<&Record> {
        self.snapshot.iter().find(|r| r.id.as_str() == id)
    }
}
