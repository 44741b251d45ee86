//! Canonical logging macros
//!
//! Every operation boundary in the rotation pipeline is logged through
//! these, so `component`, `op` and `event` are always present.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use esnap_core::log_op_start;
/// log_op_start!("list_snapshots");
/// log_op_start!("delete_snapshot", snapshot_id = "20240101_0000");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        $crate::__tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::esnap_core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        $crate::__tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::esnap_core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use esnap_core::log_op_end;
/// log_op_end!("list_snapshots", duration_ms = 42);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        $crate::__tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::esnap_core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        $crate::__tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::esnap_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// Accepts anything convertible into `ExError`. A run id attached with
/// `ExError::with_run_id` is emitted as the `run_id` field.
///
/// # Example
///
/// ```
/// # use esnap_core::{log_op_error, errors::SnapshotError};
/// let err = SnapshotError::MissingConfig { key: "ES_URL".to_string() };
/// log_op_error!("load_config", err, duration_ms = 0);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        $crate::__tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::esnap_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
            run_id = ex_err.run_id().map(|id| id.as_str()),
            "{}",
            ex_err.message()
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        $crate::__tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::esnap_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
            run_id = ex_err.run_id().map(|id| id.as_str()),
            $($field)*
        );
    }};
}
