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

//! Source directory checks and measurement.

use crate::{Error, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Summary of the files found under the source directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSummary {
    pub source_path: PathBuf,
    pub file_count: usize,
    pub total_size: u64,
}

/// Create the backup directory and any missing parents.
pub fn ensure_backup_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|source| Error::BackupDir {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Backup directory ready: {}", path.display());
    Ok(())
}

/// Check that the source exists, is a directory and can be listed.
pub fn validate_source(path: &Path) -> Result<()> {
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(Error::SourceMissing {
                path: path.to_path_buf(),
            })
        }
        Err(source) => {
            return Err(Error::SourceUnreadable {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    if !metadata.is_dir() {
        return Err(Error::SourceNotDirectory {
            path: path.to_path_buf(),
        });
    }

    fs::read_dir(path).map_err(|source| Error::SourceUnreadable {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(())
}

/// Recursively sum the sizes of all regular files under `path`.
///
/// Used for reporting only, so unreadable entries are skipped.
pub fn measure_source(path: &Path) -> SourceSummary {
    let mut file_count = 0usize;
    let mut total_size = 0u64;

    for entry in WalkDir::new(path).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry while measuring: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        match entry.metadata() {
            Ok(metadata) => {
                file_count += 1;
                total_size += metadata.len();
            }
            Err(e) => warn!("Skipping {}: {}", entry.path().display(), e),
        }
    }

    debug!(
        "Measured {}: {} files, {} bytes",
        path.display(),
        file_count,
        total_size
    );

    SourceSummary {
        source_path: path.to_path_buf(),
        file_count,
        total_size,
    }
}
