//! Rotate command

use clap::Args;
use esnap_client::EsSnapshotClient;
use esnap_core::{Result, Rotation, EXIT_SUCCESS};
use std::io::Write;

#[derive(Debug, Default, Args)]
pub struct RotateArgs {
    /// Only show which snapshots would be deleted; change nothing
    #[arg(long)]
    pub dry_run: bool,
}

pub fn execute(args: RotateArgs) -> Result<i32> {
    let config = super::load_config()?;
    let client = EsSnapshotClient::from_config(&config)?;
    let rotation = Rotation::new(&client, config.repository.clone(), config.retention);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if args.dry_run {
        let plan = rotation.plan(&mut out)?;
        writeln!(
            out,
            "Dry run: {} snapshots, keeping {}, would delete {}:",
            plan.existing.len(),
            config.retention,
            plan.to_delete.len()
        )
        .ok();
        for snapshot in &plan.to_delete {
            writeln!(out, "  {}", snapshot.id()).ok();
        }
        return Ok(EXIT_SUCCESS);
    }

    let report = rotation.run(&mut out)?;
    Ok(report.exit_code())
}
