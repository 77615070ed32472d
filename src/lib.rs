//! # chroma-backup
//!
//! Timestamped zip backups of a local Chroma vector database directory.
//!
//! ## Features
//!
//! - **Backup**: the whole source tree packed into
//!   `<prefix>_<YYYYMMDD_HHMMSS>.zip` at maximum Deflate compression
//! - **Verification**: the archive is reopened and its entries counted
//! - **Reporting**: source size, compressed size and compression ratio
//! - **History**: existing archives listed newest first, with a cleanup hint
//!   once too many accumulate
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chroma_backup::{BackupConfig, BackupRunner, Console};
//!
//! # fn main() -> chroma_backup::Result<()> {
//! let runner = BackupRunner::new(BackupConfig::default());
//! let mut console = Console::stdout(true);
//!
//! let summary = runner.run(&mut console)?;
//! println!("Archive written to {}", summary.report.archive_path.display());
//! # Ok(())
//! # }
//! ```

pub mod backup;
pub mod cli;
pub mod config;
pub mod console;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use backup::{BackupReport, BackupRunner, RunSummary};
pub use config::BackupConfig;
pub use console::Console;
pub use error::{Error, Result};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
