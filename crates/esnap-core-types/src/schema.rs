//! Canonical schema constants for structured logging and events
//!
//! Every event emitted by the rotation workflow uses these keys so log
//! pipelines can filter on them without knowing the call site. tracing
//! macros take field names as identifiers, so the logging macros spell the
//! keys out; the logging facility tests check emitted events against them.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_RUN_ID: &str = "run_id";

// Entity identifiers
pub const FIELD_REPOSITORY: &str = "repository";
pub const FIELD_SNAPSHOT_ID: &str = "snapshot_id";
pub const FIELD_SNAPSHOT_STATE: &str = "snapshot_state";

// Collection sizes
pub const FIELD_SNAPSHOT_COUNT: &str = "snapshot_count";
pub const FIELD_RETENTION_LIMIT: &str = "retention_limit";
pub const FIELD_DELETION_COUNT: &str = "deletion_count";
pub const FIELD_FAILED_COUNT: &str = "failed_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

// Operation names
pub const OP_LIST_SNAPSHOTS: &str = "list_snapshots";
pub const OP_DELETE_SNAPSHOT: &str = "delete_snapshot";
pub const OP_CREATE_SNAPSHOT: &str = "create_snapshot";
pub const OP_SNAPSHOT_STATUS: &str = "snapshot_status";
pub const OP_ROTATE: &str = "rotate";
pub const OP_LOAD_CONFIG: &str = "load_config";
