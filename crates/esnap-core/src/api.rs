//! Seam between the rotation workflow and the search service

use crate::errors::Result;
use crate::model::{Acknowledgement, CreateResponse, Snapshot};

/// Snapshot operations of a search service
///
/// Implementations are thin transports: they report what the service
/// said and leave retention, acknowledgement and verdict policy to the
/// workflow.
#[cfg_attr(test, mockall::automock)]
pub trait SnapshotApi {
    /// `GET /_snapshot/{repo}/_all`, in the order the service returns
    ///
    /// # Errors
    ///
    /// Transport failure, non-success status or malformed body.
    fn list_snapshots(&self, repository: &str) -> Result<Vec<Snapshot>>;

    /// `DELETE /_snapshot/{repo}/{id}`
    ///
    /// # Errors
    ///
    /// Transport failure, non-success status or malformed body. An
    /// unacknowledged deletion is not an error at this level.
    fn delete_snapshot(&self, repository: &str, snapshot_id: &str) -> Result<Acknowledgement>;

    /// `PUT /_snapshot/{repo}/{id}?wait_for_completion=true`
    ///
    /// # Errors
    ///
    /// Transport failure only; any HTTP answer counts as completed.
    fn create_snapshot(&self, repository: &str, snapshot_id: &str) -> Result<CreateResponse>;

    /// `GET /_snapshot/{repo}/{id}`
    ///
    /// # Errors
    ///
    /// Transport failure, non-success status or malformed body.
    fn snapshot_status(&self, repository: &str, snapshot_id: &str) -> Result<Vec<Snapshot>>;
}
