//! List command

use esnap_client::EsSnapshotClient;
use esnap_core::{Result, SnapshotApi, EXIT_SUCCESS};
use std::io::Write;

pub fn execute() -> Result<i32> {
    let config = super::load_config()?;
    let client = EsSnapshotClient::from_config(&config)?;
    let snapshots = client.list_snapshots(&config.repository)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if snapshots.is_empty() {
        writeln!(out, "No snapshots in repository {}", config.repository).ok();
    }
    for snapshot in &snapshots {
        writeln!(out, "{}\t{}", snapshot.id(), snapshot.state).ok();
    }
    Ok(EXIT_SUCCESS)
}
