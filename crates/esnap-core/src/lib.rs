//! esnap core - snapshot retention and rotation
//!
//! This crate holds everything about a rotation that does not involve a
//! network socket:
//! - Wire model of the `/_snapshot` API and typed snapshot states
//! - Environment configuration with explicit validation
//! - Retention selection and snapshot naming
//! - The `SnapshotApi` seam and the rotation workflow driving it
//! - Error and logging facilities shared by the client and the CLI

pub mod api;
pub mod config;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod naming;
pub mod retention;
pub mod workflow;

pub use esnap_core_types;

#[doc(hidden)]
pub use tracing as __tracing;

// Re-export commonly used types
pub use api::SnapshotApi;
pub use config::{Config, RetentionLimit, Timeouts};
pub use errors::{ExError, ExErrorKind, Result, SnapshotError};
pub use model::{Acknowledgement, CreateResponse, Snapshot, SnapshotList, SnapshotState};
pub use workflow::{
    exit_code_for, DeletionFailure, DeletionSweep, Rotation, RotationPlan, RotationReport,
    EXIT_FATAL, EXIT_SNAPSHOT_FAILED, EXIT_SUCCESS,
};
