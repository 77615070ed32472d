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

//! Listing of archives already present in the backup directory.

use super::archive::ARCHIVE_EXTENSION;
use crate::Result;
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// An archive found in the backup directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupEntry {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
    pub modified: DateTime<Local>,
}

/// Zip files directly inside `backup_dir`, newest first.
///
/// Subdirectories are not searched. A missing directory yields an empty list.
pub fn list_backups(backup_dir: &Path) -> Result<Vec<BackupEntry>> {
    if !backup_dir.exists() {
        return Ok(Vec::new());
    }

    let mut backups = Vec::new();

    for entry in fs::read_dir(backup_dir)? {
        let entry = entry?;
        let path = entry.path();

        if !is_archive(&path) {
            continue;
        }

        let metadata = match entry.metadata() {
            Ok(metadata) if metadata.is_file() => metadata,
            Ok(_) => continue,
            Err(e) => {
                warn!("Cannot read metadata for {}: {}", path.display(), e);
                continue;
            }
        };

        let modified = match metadata.modified() {
            Ok(modified) => DateTime::<Local>::from(modified),
            Err(e) => {
                warn!("No modification time for {}: {}", path.display(), e);
                continue;
            }
        };

        backups.push(BackupEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            path,
            size: metadata.len(),
            modified,
        });
    }

    sort_newest_first(&mut backups);
    debug!("Found {} archives in {}", backups.len(), backup_dir.display());

    Ok(backups)
}

pub fn sort_newest_first(backups: &mut [BackupEntry]) {
    backups.sort_by(|a, b| {
        b.modified
            .cmp(&a.modified)
            .then_with(|| b.name.cmp(&a.name))
    });
}

/// True when more archives exist than the configured threshold.
pub fn cleanup_advised(archive_count: usize, threshold: usize) -> bool {
    archive_count > threshold
}

fn is_archive(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(ARCHIVE_EXTENSION))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs::File;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn write_with_mtime(path: &Path, contents: &[u8], mtime: SystemTime) {
        fs::write(path, contents).unwrap();
        File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(mtime)
            .unwrap();
    }

    #[test]
    fn test_listing_is_newest_first() {
        let temp_dir = TempDir::new().unwrap();
        let base = SystemTime::now() - Duration::from_secs(3600);

        write_with_mtime(&temp_dir.path().join("b.zip"), b"t1", base);
        write_with_mtime(
            &temp_dir.path().join("a.zip"),
            b"t3",
            base + Duration::from_secs(120),
        );
        write_with_mtime(
            &temp_dir.path().join("c.zip"),
            b"t2",
            base + Duration::from_secs(60),
        );

        let names: Vec<_> = list_backups(temp_dir.path())
            .unwrap()
            .into_iter()
            .map(|b| b.name)
            .collect();

        assert_eq!(names, vec!["a.zip", "c.zip", "b.zip"]);
    }

    #[test]
    fn test_listing_ignores_other_entries() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("notes.txt"), b"keep").unwrap();
        fs::write(temp_dir.path().join("OLD.ZIP"), b"upper").unwrap();
        fs::write(temp_dir.path().join("current.zip"), vec![0u8; 2048]).unwrap();
        let nested = temp_dir.path().join("archive");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("nested.zip"), b"not listed").unwrap();
        fs::create_dir_all(temp_dir.path().join("folder.zip")).unwrap();

        let backups = list_backups(temp_dir.path()).unwrap();
        let mut names: Vec<_> = backups.iter().map(|b| b.name.as_str()).collect();
        names.sort();

        assert_eq!(names, vec!["OLD.ZIP", "current.zip"]);
        let current = backups.iter().find(|b| b.name == "current.zip").unwrap();
        assert_eq!(current.size, 2048);
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let backups = list_backups(&temp_dir.path().join("nothing-here")).unwrap();
        assert!(backups.is_empty());
    }

    #[test]
    fn test_cleanup_threshold_is_exclusive() {
        assert!(!cleanup_advised(0, 5));
        assert!(!cleanup_advised(5, 5));
        assert!(cleanup_advised(6, 5));
    }
}
