// Copyright 2025 linuxiano85
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Full backup run.
//!
//! Order of operations: ensure the backup directory, validate the source,
//! measure it, compress, verify, report, list history and advise cleanup.
//! Only the first five can fail the run; the rest are informational.

use super::archive::{self, ArchiveStats};
use super::history::{self, BackupEntry};
use super::report::{self, BackupReport};
use super::source;
use crate::config::BackupConfig;
use crate::console::Console;
use crate::Result;
use chrono::{DateTime, Local};
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub report: BackupReport,
    pub stats: ArchiveStats,
    pub history: Vec<BackupEntry>,
    pub cleanup_advised: bool,
}

/// Runs one backup according to a [`BackupConfig`]
#[derive(Debug)]
pub struct BackupRunner {
    config: BackupConfig,
}

impl BackupRunner {
    pub fn new(config: BackupConfig) -> Self {
        Self { config }
    }

    /// Run a backup stamped with the current local time.
    pub fn run<W: Write>(&self, console: &mut Console<W>) -> Result<RunSummary> {
        self.run_at(Local::now(), console)
    }

    /// Run a backup whose archive name is derived from `timestamp`.
    pub fn run_at<W: Write>(
        &self,
        timestamp: DateTime<Local>,
        console: &mut Console<W>,
    ) -> Result<RunSummary> {
        let started = Instant::now();
        let config = &self.config;

        source::ensure_backup_dir(&config.backup_dir)?;
        source::validate_source(&config.source_dir)?;
        console.info(format!(
            "Backing up {} into {}",
            config.source_dir.display(),
            config.backup_dir.display()
        ));

        let summary = source::measure_source(&config.source_dir);
        console.info(format!(
            "Source size: {} ({} files)",
            report::format_size(summary.total_size),
            summary.file_count
        ));

        let destination =
            archive::destination_path(&config.backup_dir, &config.archive_prefix, &timestamp);
        console.info(format!("Compressing to {}", destination.display()));
        info!(
            "Compressing {} -> {} (level {})",
            config.source_dir.display(),
            destination.display(),
            config.compression_level
        );

        let stats =
            archive::compress_directory(&config.source_dir, &destination, config.compression_level)?;
        let archive_size = archive::verify_archive(&destination, stats.entries)?;

        let report = BackupReport {
            archive_path: destination,
            source_path: config.source_dir.clone(),
            created_at: timestamp,
            file_count: summary.file_count,
            source_size: summary.total_size,
            archive_size,
            compression_ratio: report::compression_ratio(archive_size, summary.total_size),
            duration_ms: started.elapsed().as_millis() as u64,
        };
        print_report(console, &report);

        let history = match history::list_backups(&config.backup_dir) {
            Ok(history) => history,
            Err(e) => {
                warn!("Failed to list backups: {}", e);
                console.warn(format!("Could not list existing backups: {}", e));
                Vec::new()
            }
        };
        print_history(console, &config.backup_dir, &history);
        let cleanup_advised = print_cleanup_advice(console, history.len(), config.cleanup_threshold);

        info!(
            "Backup finished in {} ms: {} bytes -> {} bytes",
            report.duration_ms, report.source_size, report.archive_size
        );

        Ok(RunSummary {
            report,
            stats,
            history,
            cleanup_advised,
        })
    }
}

pub fn print_report<W: Write>(console: &mut Console<W>, backup: &BackupReport) {
    console.success(format!("Backup created: {}", backup.archive_path.display()));
    console.line(format!("  Source size:      {}", report::format_size(backup.source_size)));
    console.line(format!("  Compressed size:  {}", report::format_size(backup.archive_size)));
    console.line(format!("  Compression:      {}", backup.ratio_display()));
}

pub fn print_history<W: Write>(console: &mut Console<W>, backup_dir: &Path, backups: &[BackupEntry]) {
    if backups.is_empty() {
        console.info(format!("No backups found in {}", backup_dir.display()));
        return;
    }

    console.info(format!("Existing backups in {}:", backup_dir.display()));
    console.line(format!("  {:<48} {:>12}  {}", "Name", "Size", "Modified"));
    for backup in backups {
        console.line(format!(
            "  {:<48} {:>12}  {}",
            backup.name,
            report::format_megabytes(backup.size),
            backup.modified.format("%Y-%m-%d %H:%M:%S")
        ));
    }
}

/// Prints the cleanup hint when warranted; returns whether it was printed.
pub fn print_cleanup_advice<W: Write>(
    console: &mut Console<W>,
    archive_count: usize,
    threshold: usize,
) -> bool {
    if !history::cleanup_advised(archive_count, threshold) {
        return false;
    }
    console.warn(format!(
        "{} backups present (more than {}); consider deleting older archives",
        archive_count, threshold
    ));
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use chrono::TimeZone;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const ADVICE_MARKER: &str = "consider deleting older archives";

    fn config_for(root: &Path) -> BackupConfig {
        BackupConfig {
            source_dir: root.join("chroma_db"),
            backup_dir: root.join("backups"),
            ..BackupConfig::default()
        }
    }

    fn populate_source(source: &Path) {
        let collection = source.join("2d9f61c0-collection");
        fs::create_dir_all(&collection).unwrap();
        fs::write(source.join("chroma.sqlite3"), "wiki page text ".repeat(4000)).unwrap();
        fs::write(collection.join("data_level0.bin"), vec![3u8; 65536]).unwrap();
        fs::write(collection.join("link_lists.bin"), b"").unwrap();
    }

    fn quiet_console() -> Console<Vec<u8>> {
        Console::new(Vec::new(), false)
    }

    fn seed_archives(backup_dir: &Path, count: usize) {
        fs::create_dir_all(backup_dir).unwrap();
        for i in 0..count {
            fs::write(
                backup_dir.join(format!("fallout_wiki_backup_2023010{}_000000.zip", i)),
                b"PK old",
            )
            .unwrap();
        }
    }

    fn zip_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<_> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|n| n.ends_with(".zip"))
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_successful_run_creates_one_archive() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_for(temp_dir.path());
        populate_source(&config.source_dir);
        let timestamp = Local.with_ymd_and_hms(2025, 1, 31, 23, 59, 58).unwrap();

        let mut console = quiet_console();
        let summary = BackupRunner::new(config.clone())
            .run_at(timestamp, &mut console)
            .unwrap();

        assert_eq!(
            zip_names(&config.backup_dir),
            vec!["fallout_wiki_backup_20250131_235958.zip"]
        );
        let report = &summary.report;
        assert_eq!(
            report.archive_path,
            config.backup_dir.join("fallout_wiki_backup_20250131_235958.zip")
        );
        assert!(report.archive_size > 0);
        assert_eq!(report.file_count, 3);
        assert_eq!(report.source_size, 15 * 4000 + 65536);
        let expected = report.archive_size as f64 / report.source_size as f64 * 100.0;
        let reported = report.compression_ratio.unwrap();
        assert!((reported - expected).abs() <= 0.05, "{} vs {}", reported, expected);
        assert_eq!(summary.history.len(), 1);
        assert!(!summary.cleanup_advised);

        let output = String::from_utf8(console.into_inner()).unwrap();
        assert!(output.contains("[ OK ] Backup created"));
        assert!(output.contains(&format!("  Compression:      {}", report.ratio_display())));
        assert!(output.contains("fallout_wiki_backup_20250131_235958.zip"));
        assert!(!output.contains(ADVICE_MARKER));
    }

    #[test]
    fn test_missing_source_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_for(temp_dir.path());

        let mut console = quiet_console();
        let result = BackupRunner::new(config.clone()).run(&mut console);

        assert!(matches!(result, Err(Error::SourceMissing { .. })));
        let leftovers: Vec<PathBuf> = fs::read_dir(&config.backup_dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert!(leftovers.is_empty(), "unexpected files: {:?}", leftovers);
    }

    #[test]
    fn test_same_second_rerun_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_for(temp_dir.path());
        populate_source(&config.source_dir);
        let timestamp = Local.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap();
        let runner = BackupRunner::new(config.clone());

        runner.run_at(timestamp, &mut quiet_console()).unwrap();
        runner.run_at(timestamp, &mut quiet_console()).unwrap();

        assert_eq!(zip_names(&config.backup_dir).len(), 1);
    }

    #[test]
    fn test_no_advice_at_threshold() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_for(temp_dir.path());
        populate_source(&config.source_dir);
        seed_archives(&config.backup_dir, 4);

        let mut console = quiet_console();
        let summary = BackupRunner::new(config).run(&mut console).unwrap();

        assert_eq!(summary.history.len(), 5);
        assert!(!summary.cleanup_advised);
        let output = String::from_utf8(console.into_inner()).unwrap();
        assert_eq!(output.matches(ADVICE_MARKER).count(), 0);
    }

    #[test]
    fn test_advice_printed_once_above_threshold() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_for(temp_dir.path());
        populate_source(&config.source_dir);
        seed_archives(&config.backup_dir, 5);

        let mut console = quiet_console();
        let summary = BackupRunner::new(config).run(&mut console).unwrap();

        assert_eq!(summary.history.len(), 6);
        assert!(summary.cleanup_advised);
        let output = String::from_utf8(console.into_inner()).unwrap();
        assert_eq!(output.matches(ADVICE_MARKER).count(), 1);
    }

    #[test]
    fn test_new_archive_listed_first() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_for(temp_dir.path());
        populate_source(&config.source_dir);
        seed_archives(&config.backup_dir, 2);
        let old = std::time::SystemTime::now() - std::time::Duration::from_secs(86_400);
        for name in zip_names(&config.backup_dir) {
            fs::File::options()
                .write(true)
                .open(config.backup_dir.join(name))
                .unwrap()
                .set_modified(old)
                .unwrap();
        }

        let summary = BackupRunner::new(config)
            .run(&mut quiet_console())
            .unwrap();

        assert_eq!(summary.history[0].path, summary.report.archive_path);
    }

    #[test]
    fn test_empty_source_reports_na_ratio() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_for(temp_dir.path());
        fs::create_dir_all(&config.source_dir).unwrap();

        let mut console = quiet_console();
        let summary = BackupRunner::new(config).run(&mut console).unwrap();

        assert_eq!(summary.report.compression_ratio, None);
        assert_eq!(summary.stats.entries, 1);
        let output = String::from_utf8(console.into_inner()).unwrap();
        assert!(output.contains("  Compression:      n/a"));
    }
}
