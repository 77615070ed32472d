//! Backup command implementation.

use std::io::Write;

use crate::backup::BackupRunner;
use crate::config::BackupConfig;
use crate::console::Console;

/// Run a full backup with the resolved configuration.
pub fn run<W: Write>(config: BackupConfig, console: &mut Console<W>) -> anyhow::Result<()> {
    let summary = BackupRunner::new(config).run(console)?;

    tracing::debug!(
        "Archived {} entries into {}",
        summary.stats.entries,
        summary.report.archive_path.display()
    );
    console.success("Backup completed successfully");
    Ok(())
}
