//! Snapshot rotation workflow.
//!
//! ## Pipeline (in order):
//! 1. Enumerate snapshots in the repository (fatal on failure)
//! 2. Order chronologically when start times are reported
//! 3. Select everything but the newest `retention` snapshots
//! 4. Best-effort deletion sweep (per-item failures are recorded, not fatal)
//! 5. Synchronous creation of a timestamp-named snapshot (fatal on transport failure)
//! 6. Status check of the new snapshot, mapped to a process exit code
//!
//! Progress is narrated line by line to the supplied writer; structured
//! events go through the logging facility.

use crate::api::SnapshotApi;
use crate::config::RetentionLimit;
use crate::errors::{ExError, Result, SnapshotError};
use crate::model::{Snapshot, SnapshotState};
use crate::naming::unique_snapshot_id;
use crate::retention::{order_chronologically, select_for_deletion};
use crate::{log_op_end, log_op_error, log_op_start};
use chrono::{DateTime, Local, TimeZone};
use esnap_core_types::schema::{
    OP_CREATE_SNAPSHOT, OP_DELETE_SNAPSHOT, OP_LIST_SNAPSHOTS, OP_ROTATE, OP_SNAPSHOT_STATUS,
};
use esnap_core_types::RunId;
use std::fmt::Display;
use std::io::Write;
use std::time::Instant;

/// New snapshot reached `SUCCESS`
pub const EXIT_SUCCESS: i32 = 0;
/// New snapshot ended in any other state
pub const EXIT_SNAPSHOT_FAILED: i32 = 1;
/// Configuration, transport or decode failure before a verdict
pub const EXIT_FATAL: i32 = 2;

pub fn exit_code_for(state: &SnapshotState) -> i32 {
    if state.is_success() {
        EXIT_SUCCESS
    } else {
        EXIT_SNAPSHOT_FAILED
    }
}

/// One snapshot the sweep could not delete
#[derive(Debug, Clone, PartialEq)]
pub struct DeletionFailure {
    pub snapshot_id: String,
    pub error: SnapshotError,
}

/// Outcome of the best-effort deletion sweep
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeletionSweep {
    pub deleted: Vec<String>,
    pub failed: Vec<DeletionFailure>,
}

impl DeletionSweep {
    pub fn attempted(&self) -> usize {
        self.deleted.len() + self.failed.len()
    }

    /// True when every attempted deletion was acknowledged
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn summary(&self) -> String {
        if self.is_complete() {
            format!("Deleted {} of {} snapshots", self.deleted.len(), self.attempted())
        } else {
            format!(
                "Deleted {} of {} snapshots, {} failed",
                self.deleted.len(),
                self.attempted(),
                self.failed.len()
            )
        }
    }
}

/// Snapshots found and the ones selected for deletion
#[derive(Debug, Clone, PartialEq)]
pub struct RotationPlan {
    /// All snapshots, oldest first
    pub existing: Vec<Snapshot>,
    pub to_delete: Vec<Snapshot>,
    /// Whether `existing` was ordered by reported start times
    pub chronological: bool,
}

/// Result of a complete rotation
#[derive(Debug, Clone, PartialEq)]
pub struct RotationReport {
    pub run_id: RunId,
    pub plan: RotationPlan,
    pub sweep: DeletionSweep,
    pub snapshot_id: String,
    pub state: SnapshotState,
}

impl RotationReport {
    pub fn exit_code(&self) -> i32 {
        exit_code_for(&self.state)
    }
}

/// Rotation of one repository through a `SnapshotApi`
pub struct Rotation<'a, A: SnapshotApi + ?Sized> {
    api: &'a A,
    repository: String,
    retention: RetentionLimit,
    run_id: RunId,
}

impl<'a, A: SnapshotApi + ?Sized> Rotation<'a, A> {
    pub fn new(api: &'a A, repository: impl Into<String>, retention: RetentionLimit) -> Self {
        Self {
            api,
            repository: repository.into(),
            retention,
            run_id: RunId::new(),
        }
    }

    pub fn with_run_id(mut self, run_id: RunId) -> Self {
        self.run_id = run_id;
        self
    }

    pub fn run_id(&self) -> &RunId {
        &self.run_id
    }

    /// Enumerate and select, without changing anything remotely
    ///
    /// # Errors
    ///
    /// Any failure of the enumeration request.
    pub fn plan(&self, out: &mut impl Write) -> Result<RotationPlan> {
        let started = Instant::now();
        log_op_start!(
            OP_LIST_SNAPSHOTS,
            run_id = %self.run_id,
            repository = %self.repository
        );
        say(out, "Getting old snapshots...");

        let mut existing = match self.api.list_snapshots(&self.repository) {
            Ok(snapshots) => snapshots,
            Err(err) => {
                say_line(out, "failed");
                log_op_error!(
                    OP_LIST_SNAPSHOTS,
                    self.ex_error(&err),
                    duration_ms = elapsed_ms(started)
                );
                return Err(err);
            }
        };

        let chronological = order_chronologically(&mut existing);
        let to_delete = select_for_deletion(&existing, self.retention).to_vec();
        if to_delete.is_empty() {
            say_line(out, "nothing to delete");
        } else {
            say_line(out, "done");
        }

        log_op_end!(
            OP_LIST_SNAPSHOTS,
            duration_ms = elapsed_ms(started),
            run_id = %self.run_id,
            snapshot_count = existing.len(),
            retention_limit = self.retention.get(),
            deletion_count = to_delete.len(),
            chronological = chronological
        );

        Ok(RotationPlan {
            existing,
            to_delete,
            chronological,
        })
    }

    /// Delete every snapshot in `to_delete`, continuing past failures
    pub fn sweep(&self, to_delete: &[Snapshot], out: &mut impl Write) -> DeletionSweep {
        let mut sweep = DeletionSweep::default();
        if to_delete.is_empty() {
            return sweep;
        }

        say_line(out, "Deleting old snapshots...");
        for snapshot in to_delete {
            let snapshot_id = snapshot.id();
            let started = Instant::now();
            log_op_start!(
                OP_DELETE_SNAPSHOT,
                run_id = %self.run_id,
                snapshot_id = snapshot_id
            );
            say(out, format_args!("Deleting ID: {} ...", snapshot_id));

            let outcome = self
                .api
                .delete_snapshot(&self.repository, snapshot_id)
                .and_then(|ack| {
                    if ack.acknowledged {
                        Ok(())
                    } else {
                        Err(SnapshotError::NotAcknowledged {
                            snapshot_id: snapshot_id.to_string(),
                        })
                    }
                });

            match outcome {
                Ok(()) => {
                    say_line(out, "done");
                    log_op_end!(
                        OP_DELETE_SNAPSHOT,
                        duration_ms = elapsed_ms(started),
                        run_id = %self.run_id,
                        snapshot_id = snapshot_id
                    );
                    sweep.deleted.push(snapshot_id.to_string());
                }
                Err(error) => {
                    say_line(out, format_args!("failed: {}", error));
                    log_op_error!(
                        OP_DELETE_SNAPSHOT,
                        self.ex_error(&error),
                        duration_ms = elapsed_ms(started),
                        snapshot_id = snapshot_id
                    );
                    sweep.failed.push(DeletionFailure {
                        snapshot_id: snapshot_id.to_string(),
                        error,
                    });
                }
            }
        }

        say_line(out, sweep.summary());
        if !sweep.is_complete() {
            tracing::warn!(
                run_id = %self.run_id,
                deletion_count = sweep.attempted(),
                failed_count = sweep.failed.len(),
                "deletion sweep partially succeeded"
            );
        }
        sweep
    }

    /// Create `snapshot_id` and block until the service finishes
    ///
    /// # Errors
    ///
    /// Transport failure of the create request.
    pub fn create(&self, snapshot_id: &str, out: &mut impl Write) -> Result<()> {
        let started = Instant::now();
        log_op_start!(
            OP_CREATE_SNAPSHOT,
            run_id = %self.run_id,
            snapshot_id = snapshot_id
        );
        say(
            out,
            format_args!(
                "Creating snapshot {}, repo: {} ...",
                snapshot_id, self.repository
            ),
        );

        match self.api.create_snapshot(&self.repository, snapshot_id) {
            Ok(response) => {
                if response.is_success() {
                    say_line(out, "done");
                } else {
                    say_line(out, format_args!("done (HTTP {})", response.http_status));
                    tracing::warn!(
                        run_id = %self.run_id,
                        snapshot_id = snapshot_id,
                        http_status = response.http_status,
                        "create request was not accepted, status check decides"
                    );
                }
                log_op_end!(
                    OP_CREATE_SNAPSHOT,
                    duration_ms = elapsed_ms(started),
                    run_id = %self.run_id,
                    snapshot_id = snapshot_id,
                    http_status = response.http_status
                );
                Ok(())
            }
            Err(err) => {
                say_line(out, "failed");
                log_op_error!(
                    OP_CREATE_SNAPSHOT,
                    self.ex_error(&err),
                    duration_ms = elapsed_ms(started),
                    snapshot_id = snapshot_id
                );
                Err(err)
            }
        }
    }

    /// Read back the state of `snapshot_id`
    ///
    /// # Errors
    ///
    /// Transport or decode failure, or no entry for the snapshot.
    pub fn verify(&self, snapshot_id: &str, out: &mut impl Write) -> Result<SnapshotState> {
        let started = Instant::now();
        log_op_start!(
            OP_SNAPSHOT_STATUS,
            run_id = %self.run_id,
            snapshot_id = snapshot_id
        );
        say(out, format_args!("Checking snapshot {} state: ", snapshot_id));

        let first = self
            .api
            .snapshot_status(&self.repository, snapshot_id)
            .and_then(|entries| {
                entries
                    .into_iter()
                    .next()
                    .ok_or_else(|| SnapshotError::SnapshotMissing {
                        repository: self.repository.clone(),
                        snapshot_id: snapshot_id.to_string(),
                    })
            });

        match first {
            Ok(snapshot) => {
                let state = snapshot.state();
                say_line(out, &state);
                log_op_end!(
                    OP_SNAPSHOT_STATUS,
                    duration_ms = elapsed_ms(started),
                    run_id = %self.run_id,
                    snapshot_id = snapshot_id,
                    snapshot_state = %state
                );
                Ok(state)
            }
            Err(err) => {
                say_line(out, "failed");
                log_op_error!(
                    OP_SNAPSHOT_STATUS,
                    self.ex_error(&err),
                    duration_ms = elapsed_ms(started),
                    snapshot_id = snapshot_id
                );
                Err(err)
            }
        }
    }

    /// Full rotation using the local wall clock for the new name
    ///
    /// # Errors
    ///
    /// See [`Rotation::run_at`].
    pub fn run(&self, out: &mut impl Write) -> Result<RotationReport> {
        self.run_at(&Local::now(), out)
    }

    /// Full rotation with `now` as the creation time of the new snapshot
    ///
    /// # Errors
    ///
    /// Enumeration, creation or status-check failures. Deletion failures
    /// are reported in the sweep, not here.
    pub fn run_at<Tz>(&self, now: &DateTime<Tz>, out: &mut impl Write) -> Result<RotationReport>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let started = Instant::now();
        log_op_start!(
            OP_ROTATE,
            run_id = %self.run_id,
            repository = %self.repository,
            retention_limit = self.retention.get()
        );

        let result = self.rotate(now, out);
        match &result {
            Ok(report) => {
                log_op_end!(
                    OP_ROTATE,
                    duration_ms = elapsed_ms(started),
                    run_id = %self.run_id,
                    snapshot_id = %report.snapshot_id,
                    snapshot_state = %report.state,
                    deletion_count = report.sweep.attempted(),
                    failed_count = report.sweep.failed.len()
                );
            }
            Err(err) => {
                log_op_error!(
                    OP_ROTATE,
                    self.ex_error(&err),
                    duration_ms = elapsed_ms(started)
                );
            }
        }
        result
    }

    fn ex_error(&self, err: &SnapshotError) -> ExError {
        ExError::from(err.clone()).with_run_id(self.run_id.clone())
    }

    fn rotate<Tz>(&self, now: &DateTime<Tz>, out: &mut impl Write) -> Result<RotationReport>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let plan = self.plan(out)?;
        let sweep = self.sweep(&plan.to_delete, out);

        let snapshot_id = unique_snapshot_id(now, &plan.existing);
        self.create(&snapshot_id, out)?;
        let state = self.verify(&snapshot_id, out)?;

        Ok(RotationReport {
            run_id: self.run_id.clone(),
            plan,
            sweep,
            snapshot_id,
            state,
        })
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

// Narration is informational; a closed stdout must not abort a rotation.
fn say(out: &mut impl Write, text: impl Display) {
    write!(out, "{}", text).ok();
    out.flush().ok();
}

fn say_line(out: &mut impl Write, text: impl Display) {
    writeln!(out, "{}", text).ok();
}
