use esnap_core_types::RunId;
use thiserror::Error;

/// Result type alias using SnapshotError
pub type Result<T> = std::result::Result<T, SnapshotError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code used in structured log events
/// and in the CLI's diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Configuration
    ConfigMissing,
    InvalidConfig,

    // Remote service
    Transport,
    Timeout,
    ExternalService,
    Decode,
    NotFound,
    NotAcknowledged,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::ConfigMissing => "ERR_CONFIG_MISSING",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::Transport => "ERR_TRANSPORT",
            ExErrorKind::Timeout => "ERR_TIMEOUT",
            ExErrorKind::ExternalService => "ERR_EXTERNAL_SERVICE",
            ExErrorKind::Decode => "ERR_DECODE",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::NotAcknowledged => "ERR_NOT_ACKNOWLEDGED",
        }
    }
}

/// Canonical structured error type
///
/// Carries the classification used for programmatic handling plus the
/// context (operation, snapshot id, run) needed to read a log line alone.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    run_id: Option<RunId>,
    message: String,
}

impl ExError {
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            run_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity context (a config key or snapshot id)
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add the rotation run the failure belongs to
    pub fn with_run_id(mut self, run_id: RunId) -> Self {
        self.run_id = Some(run_id);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn run_id(&self) -> Option<&RunId> {
        self.run_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(run_id) = &self.run_id {
            write!(f, " (run_id: {})", run_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Failures of the snapshot rotation pipeline
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SnapshotError {
    // ===== Configuration =====
    /// A required environment variable is absent
    #[error("required environment variable {key} is not set")]
    MissingConfig { key: String },

    /// A configuration value is present but unusable
    #[error("invalid value for {key}: {reason}")]
    InvalidConfig { key: String, reason: String },

    // ===== Remote service =====
    /// The request never produced a response (connect, TLS, I/O)
    #[error("{op} request failed: {reason}")]
    Transport { op: String, reason: String },

    /// The per-operation timeout expired
    #[error("{op} request timed out: {reason}")]
    Timeout { op: String, reason: String },

    /// The service answered with a non-success status
    #[error("{op} returned HTTP {status}: {body}")]
    HttpStatus { op: String, status: u16, body: String },

    /// The response body was not the expected JSON shape
    #[error("error decoding {op} response: {reason}")]
    Decode { op: String, reason: String },

    /// The status lookup returned no entry for the snapshot
    #[error("snapshot {snapshot_id} not found in repository {repository}")]
    SnapshotMissing {
        repository: String,
        snapshot_id: String,
    },

    /// The service did not acknowledge a deletion
    #[error("snapshot deletion not acknowledged: {snapshot_id}")]
    NotAcknowledged { snapshot_id: String },
}

impl SnapshotError {
    pub fn transport(op: &str, reason: impl Into<String>) -> Self {
        SnapshotError::Transport {
            op: op.to_string(),
            reason: reason.into(),
        }
    }

    pub fn decode(op: &str, reason: impl Into<String>) -> Self {
        SnapshotError::Decode {
            op: op.to_string(),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ExErrorKind {
        ExError::from(self.clone()).kind()
    }
}

impl From<SnapshotError> for ExError {
    fn from(err: SnapshotError) -> Self {
        let message = err.to_string();
        match err {
            SnapshotError::MissingConfig { key } => ExError::new(ExErrorKind::ConfigMissing)
                .with_op(esnap_core_types::schema::OP_LOAD_CONFIG)
                .with_entity_id(key),
            SnapshotError::InvalidConfig { key, .. } => ExError::new(ExErrorKind::InvalidConfig)
                .with_op(esnap_core_types::schema::OP_LOAD_CONFIG)
                .with_entity_id(key),
            SnapshotError::Transport { op, .. } => {
                ExError::new(ExErrorKind::Transport).with_op(op)
            }
            SnapshotError::Timeout { op, .. } => ExError::new(ExErrorKind::Timeout).with_op(op),
            SnapshotError::HttpStatus { op, .. } => {
                ExError::new(ExErrorKind::ExternalService).with_op(op)
            }
            SnapshotError::Decode { op, .. } => ExError::new(ExErrorKind::Decode).with_op(op),
            SnapshotError::SnapshotMissing { snapshot_id, .. } => {
                ExError::new(ExErrorKind::NotFound)
                    .with_op(esnap_core_types::schema::OP_SNAPSHOT_STATUS)
                    .with_entity_id(snapshot_id)
            }
            SnapshotError::NotAcknowledged { snapshot_id } => {
                ExError::new(ExErrorKind::NotAcknowledged)
                    .with_op(esnap_core_types::schema::OP_DELETE_SNAPSHOT)
                    .with_entity_id(snapshot_id)
            }
        }
        .with_message(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_names_key() {
        let err = SnapshotError::MissingConfig {
            key: "ES_URL".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "required environment variable ES_URL is not set"
        );

        let ex: ExError = err.into();
        assert_eq!(ex.kind(), ExErrorKind::ConfigMissing);
        assert_eq!(ex.entity_id(), Some("ES_URL"));
    }

    #[test]
    fn test_display_includes_code_and_op() {
        let ex: ExError = SnapshotError::decode("list_snapshots", "expected value").into();
        let rendered = ex.to_string();
        assert!(rendered.starts_with("[ERR_DECODE] in operation 'list_snapshots'"));
        assert!(rendered.contains("expected value"));
    }

    #[test]
    fn test_http_status_is_external_service() {
        let err = SnapshotError::HttpStatus {
            op: "snapshot_status".to_string(),
            status: 404,
            body: "{}".to_string(),
        };
        assert_eq!(err.kind(), ExErrorKind::ExternalService);
    }

    #[test]
    fn test_run_id_context() {
        let run_id = RunId::from_string("r-1".to_string());
        let ex = ExError::from(SnapshotError::transport("snapshot_status", "refused"))
            .with_run_id(run_id.clone());
        assert_eq!(ex.run_id(), Some(&run_id));
        assert!(ex.to_string().ends_with("(run_id: r-1)"));
    }
}
