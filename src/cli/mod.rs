//! Command-line interface for chroma-backup.
//!
//! With no subcommand a backup is performed, so a bare `chroma-backup`
//! backs up `./chroma_db` into `./backups`.

use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::config::{BackupConfig, ConfigOverrides};
use crate::console::Console;

pub mod backup;
pub mod list;

/// chroma-backup - timestamped zip backups of a Chroma database directory
#[derive(Parser, Debug)]
#[command(name = "chroma-backup")]
#[command(about = "Create timestamped, compressed backups of a Chroma database directory")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// TOML configuration file
    #[arg(long, global = true, env = "CHROMA_BACKUP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory to back up [default: chroma_db]
    #[arg(short, long, global = true, env = "CHROMA_BACKUP_SOURCE")]
    pub source: Option<PathBuf>,

    /// Directory where archives are stored [default: backups]
    #[arg(short, long, global = true, env = "CHROMA_BACKUP_DIR")]
    pub backup_dir: Option<PathBuf>,

    /// Archive file name prefix [default: fallout_wiki_backup]
    #[arg(long, global = true)]
    pub prefix: Option<String>,

    /// Deflate compression level [default: 9]
    #[arg(long, global = true, value_parser = clap::value_parser!(i64).range(1..=9))]
    pub level: Option<i64>,

    /// Suggest cleanup when more than this many archives exist [default: 5]
    #[arg(long, global = true)]
    pub keep_threshold: Option<usize>,

    /// Wait for Enter before exiting
    #[arg(short, long, global = true)]
    pub interactive: bool,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable coloured output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Archive the source directory (default)
    Backup,
    /// List existing archives without creating a new one
    List,
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            source_dir: self.source.clone(),
            backup_dir: self.backup_dir.clone(),
            archive_prefix: self.prefix.clone(),
            compression_level: self.level,
            cleanup_threshold: self.keep_threshold,
        }
    }

    /// Defaults, then the config file, then flags and environment.
    pub fn resolve_config(&self) -> crate::Result<BackupConfig> {
        let config = BackupConfig::load(self.config.as_deref())?.with_overrides(self.overrides());
        config.validate()?;
        Ok(config)
    }
}

/// Dispatch the parsed command line.
pub fn run<W: Write>(cli: &Cli, console: &mut Console<W>) -> anyhow::Result<()> {
    let config = cli.resolve_config()?;

    match cli.command.unwrap_or(Commands::Backup) {
        Commands::Backup => backup::run(config, console),
        Commands::List => list::run(config, console),
    }
}

/// Block until a line (or EOF) arrives on `input`.
pub fn wait_for_enter<W: Write, R: BufRead>(console: &mut Console<W>, mut input: R) {
    console.line("Press Enter to exit...");
    console.flush();
    let mut line = String::new();
    let _ = input.read_line(&mut line);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_bare_invocation_defaults_to_backup() {
        let cli = Cli::try_parse_from(["chroma-backup"]).unwrap();
        assert_eq!(cli.command, None);
        assert!(!cli.interactive);
        assert_eq!(cli.overrides().source_dir, None);
    }

    #[test]
    fn test_flags_become_overrides() {
        let cli = Cli::try_parse_from([
            "chroma-backup",
            "list",
            "--source",
            "/data/chroma",
            "-b",
            "/mnt/backups",
            "--level",
            "6",
            "--keep-threshold",
            "10",
            "--interactive",
        ])
        .unwrap();

        assert_eq!(cli.command, Some(Commands::List));
        assert!(cli.interactive);
        let config = cli.resolve_config().unwrap();
        assert_eq!(config.source_dir, PathBuf::from("/data/chroma"));
        assert_eq!(config.backup_dir, PathBuf::from("/mnt/backups"));
        assert_eq!(config.compression_level, 6);
        assert_eq!(config.cleanup_threshold, 10);
        assert_eq!(config.archive_prefix, "fallout_wiki_backup");
    }

    #[test]
    fn test_level_out_of_range_rejected() {
        assert!(Cli::try_parse_from(["chroma-backup", "--level", "12"]).is_err());
    }

    #[test]
    fn test_wait_for_enter_prompts_and_returns() {
        let mut console = Console::new(Vec::new(), false);
        wait_for_enter(&mut console, Cursor::new(b"\n".to_vec()));
        let output = String::from_utf8(console.into_inner()).unwrap();
        assert_eq!(output, "Press Enter to exit...\n");
    }
}
