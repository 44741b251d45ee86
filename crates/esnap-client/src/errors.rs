//! Error handling for esnap-client
//!
//! Maps reqwest and serde failures onto `esnap_core::SnapshotError`.

use esnap_core::config::ENV_URL;
use esnap_core::SnapshotError;

/// Longest response body kept in an error message
const MAX_BODY_IN_ERROR: usize = 512;

/// Classify a reqwest failure that happened before or while reading a response
pub fn from_reqwest(op: &str, err: reqwest::Error) -> SnapshotError {
    if err.is_timeout() {
        SnapshotError::Timeout {
            op: op.to_string(),
            reason: err.to_string(),
        }
    } else {
        SnapshotError::transport(op, err.to_string())
    }
}

/// Create a non-success status error
pub fn status_error(op: &str, status: reqwest::StatusCode, body: &str) -> SnapshotError {
    SnapshotError::HttpStatus {
        op: op.to_string(),
        status: status.as_u16(),
        body: truncate(body.trim(), MAX_BODY_IN_ERROR),
    }
}

/// Create a decode error from serde_json::Error
pub fn decode_error(op: &str, err: serde_json::Error) -> SnapshotError {
    SnapshotError::decode(op, err.to_string())
}

/// Create an invalid base URL error
pub fn invalid_url(reason: impl Into<String>) -> SnapshotError {
    SnapshotError::InvalidConfig {
        key: ENV_URL.to_string(),
        reason: reason.into(),
    }
}

fn truncate(body: &str, max: usize) -> String {
    if body.len() <= max {
        return body.to_string();
    }
    let mut end = max;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
