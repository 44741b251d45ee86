//! Retention selection
//!
//! The selector assumes the collection is oldest-first. The service
//! returns snapshots in creation order, and `order_chronologically` can
//! enforce that when start times are available.

use crate::config::RetentionLimit;
use crate::model::Snapshot;

/// Snapshots that fall outside the retention window
///
/// Returns the first `len - limit` entries in input order, or nothing when
/// the collection already fits. Never reorders.
pub fn select_for_deletion(snapshots: &[Snapshot], limit: RetentionLimit) -> &[Snapshot] {
    let excess = snapshots.len().saturating_sub(limit.get());
    &snapshots[..excess]
}

/// Stable sort by `start_time_in_millis`, oldest first
///
/// Applied only when every entry reports a start time; a partial sort
/// would mix reported and implied order. Returns whether the order was
/// taken from start times.
pub fn order_chronologically(snapshots: &mut [Snapshot]) -> bool {
    if snapshots.is_empty()
        || snapshots
            .iter()
            .any(|s| s.start_time_in_millis.is_none())
    {
        return false;
    }
    snapshots.sort_by_key(|s| s.start_time_in_millis);
    true
}
