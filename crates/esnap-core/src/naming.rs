//! Names for newly created snapshots

use crate::model::Snapshot;
use chrono::{DateTime, TimeZone};
use std::fmt::Display;

/// Minute-granular name, e.g. `20240315_0930`
pub const SNAPSHOT_ID_FORMAT: &str = "%Y%m%d_%H%M";

/// Second-granular name used when the minute name is taken
pub const SNAPSHOT_ID_FORMAT_SECONDS: &str = "%Y%m%d_%H%M%S";

pub fn snapshot_id_at<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    now.format(SNAPSHOT_ID_FORMAT).to_string()
}

/// Name for a snapshot created at `now` that does not clash with `existing`
///
/// Falls back to second granularity, then to a numeric suffix, when a run
/// repeats within the same minute.
pub fn unique_snapshot_id<Tz>(now: &DateTime<Tz>, existing: &[Snapshot]) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let taken = |id: &str| existing.iter().any(|s| s.id() == id);

    let minute = snapshot_id_at(now);
    if !taken(&minute) {
        return minute;
    }

    let second = now.format(SNAPSHOT_ID_FORMAT_SECONDS).to_string();
    if !taken(&second) {
        return second;
    }

    let mut n = 1u32;
    loop {
        let candidate = format!("{}_{}", second, n);
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}
