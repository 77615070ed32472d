//! List command implementation for viewing existing archives.

use std::io::Write;

use crate::backup::history;
use crate::backup::runner::{print_cleanup_advice, print_history};
use crate::config::BackupConfig;
use crate::console::Console;

/// Print the archive history and the cleanup hint, without backing up.
pub fn run<W: Write>(config: BackupConfig, console: &mut Console<W>) -> anyhow::Result<()> {
    let backups = history::list_backups(&config.backup_dir)?;

    print_history(console, &config.backup_dir, &backups);
    print_cleanup_advice(console, backups.len(), config.cleanup_threshold);
    Ok(())
}
