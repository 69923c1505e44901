use serde_json::Value;
use std::path::PathBuf;

/// One page of a collection endpoint
#[derive(Debug, Clone, Default)]
pub struct Page {
    /// Records in the order the server returned them
    pub records: Vec<Value>,
    /// Raw `Link` response header, if any
    pub link: Option<String>,
}

impl Page {
    pub fn new(records: Vec<Value>, link: Option<String>) -> Self {
        Self { records, link }
    }

    /// URL of the `rel="next"` relation advertised by this page
    pub fn next_url(&self) -> Option<String> {
        self.link.as_deref().and_then(crate::github::parse_next_link)
    }
}

/// Rate limit state reported by the last API response
#[derive(Debug, Clone)]
pub struct RateLimitState {
    pub remaining: u32,
    pub limit: u32,
    pub reset_time: chrono::DateTime<chrono::Utc>,
    pub is_limited: bool,
}

/// What a finished `git clone` process left behind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitOutput {
    pub success: bool,
    pub code: Option<i32>,
    /// stdout followed by stderr
    pub text: String,
}

/// Best-effort reading of why a clone exited non-zero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    CredentialInvalid,
    AlreadyExists,
}

/// Outcome of one interactive session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub cloned: Vec<PathBuf>,
    pub failed: usize,
}
