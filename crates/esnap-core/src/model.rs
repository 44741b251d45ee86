//! Wire model of the `/_snapshot` API

use serde::{Deserialize, Serialize};
use std::fmt;

/// One snapshot as reported by the search service
///
/// Fields beyond the ones below (indices, shards, failures, ...) are
/// ignored when decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Snapshot name, unique within its repository
    pub snapshot: String,
    #[serde(default)]
    pub state: String,
    /// Creation time, when the service reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time_in_millis: Option<u64>,
}

impl Snapshot {
    pub fn new(snapshot: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            snapshot: snapshot.into(),
            state: state.into(),
            start_time_in_millis: None,
        }
    }

    pub fn with_start_time(mut self, millis: u64) -> Self {
        self.start_time_in_millis = Some(millis);
        self
    }

    pub fn id(&self) -> &str {
        &self.snapshot
    }

    pub fn state(&self) -> SnapshotState {
        SnapshotState::from_label(&self.state)
    }
}

/// Body of `GET /_snapshot/{repo}/_all` and `GET /_snapshot/{repo}/{id}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotList {
    pub snapshots: Vec<Snapshot>,
}

/// Body of `DELETE /_snapshot/{repo}/{id}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgement {
    pub acknowledged: bool,
}

/// Outcome of a synchronous create request
///
/// The body is not examined; only the HTTP status is kept so the
/// workflow can warn about a rejected request before verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateResponse {
    pub http_status: u16,
}

impl CreateResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.http_status)
    }
}

/// Typed view of a snapshot state label
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotState {
    Success,
    InProgress,
    Partial,
    Failed,
    Incompatible,
    /// Any label this tool does not know, including the empty string
    Other(String),
}

impl SnapshotState {
    pub const SUCCESS_LABEL: &'static str = "SUCCESS";

    pub fn from_label(label: &str) -> Self {
        match label {
            "SUCCESS" => SnapshotState::Success,
            "IN_PROGRESS" => SnapshotState::InProgress,
            "PARTIAL" => SnapshotState::Partial,
            "FAILED" => SnapshotState::Failed,
            "INCOMPATIBLE" => SnapshotState::Incompatible,
            other => SnapshotState::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SnapshotState::Success => Self::SUCCESS_LABEL,
            SnapshotState::InProgress => "IN_PROGRESS",
            SnapshotState::Partial => "PARTIAL",
            SnapshotState::Failed => "FAILED",
            SnapshotState::Incompatible => "INCOMPATIBLE",
            SnapshotState::Other(label) => label,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SnapshotState::Success)
    }
}

impl fmt::Display for SnapshotState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
