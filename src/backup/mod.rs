//! Backup steps: source checks, archive creation, history and reporting.
//!
//! Each step is a plain function so it can be exercised on its own; the
//! [`BackupRunner`] strings them together for a full run.

pub mod archive;
pub mod history;
pub mod report;
pub mod runner;
pub mod source;

// Re-export main types
pub use archive::{compress_directory, destination_path, verify_archive, ArchiveStats};
pub use history::{cleanup_advised, list_backups, BackupEntry};
pub use report::{compression_ratio, format_size, BackupReport};
pub use runner::{BackupRunner, RunSummary};
pub use source::{ensure_backup_dir, measure_source, validate_source, SourceSummary};
