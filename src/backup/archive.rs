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

//! Zip archive creation and verification.
//!
//! Entries are rooted at the source directory's own name, so archiving
//! `./chroma_db` yields `chroma_db/`, `chroma_db/chroma.sqlite3`, and so on.
//! Directories get explicit entries so empty ones survive extraction.

use crate::{Error, Result};
use chrono::{DateTime, Datelike, Local, Timelike};
use std::fs::{self, File};
use std::io::{self, BufWriter, ErrorKind};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, warn};
use walkdir::WalkDir;
use zip::result::ZipResult;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Timestamp embedded in archive file names (local time, second resolution)
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

pub const ARCHIVE_EXTENSION: &str = "zip";

/// Root entry name used when the source path has no final component
const FALLBACK_ROOT_NAME: &str = "source";

/// What went into a freshly written archive
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveStats {
    /// Total entries written, directories included
    pub entries: usize,
    pub files: usize,
    pub directories: usize,
    /// Uncompressed bytes read from the source
    pub bytes_in: u64,
}

/// File name for an archive created at `timestamp`.
pub fn archive_file_name(prefix: &str, timestamp: &DateTime<Local>) -> String {
    format!(
        "{}_{}.{}",
        prefix,
        timestamp.format(TIMESTAMP_FORMAT),
        ARCHIVE_EXTENSION
    )
}

pub fn destination_path(backup_dir: &Path, prefix: &str, timestamp: &DateTime<Local>) -> PathBuf {
    backup_dir.join(archive_file_name(prefix, timestamp))
}

/// Archive the whole `source` tree into `destination`, replacing any file
/// already there. On failure the partially written file is left in place.
pub fn compress_directory(source: &Path, destination: &Path, level: i64) -> Result<ArchiveStats> {
    write_archive(source, destination, level).map_err(|e| Error::Compression {
        path: destination.to_path_buf(),
        source: e,
    })
}

fn write_archive(source: &Path, destination: &Path, level: i64) -> ZipResult<ArchiveStats> {
    let root_name = root_entry_name(source)?;
    let file = File::create(destination)?;
    let destination = fs::canonicalize(destination)?;
    let mut zip = ZipWriter::new(BufWriter::new(file));

    let base_options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(level));

    let mut stats = ArchiveStats::default();

    for entry in WalkDir::new(source).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(io::Error::from)?;
        let file_type = entry.file_type();

        if file_type.is_symlink() {
            warn!("Skipping symbolic link: {}", entry.path().display());
            continue;
        }
        if file_type.is_file() && is_same_file(entry.path(), &destination) {
            debug!("Skipping the archive being written: {}", entry.path().display());
            continue;
        }

        let relative = entry.path().strip_prefix(source).unwrap_or(Path::new(""));
        let name = entry_name(&root_name, relative);
        let metadata = entry.metadata().map_err(io::Error::from)?;
        let options = entry_options(base_options, &metadata);

        if file_type.is_dir() {
            zip.add_directory(format!("{}/", name), options)?;
            stats.directories += 1;
        } else if file_type.is_file() {
            let options = options.large_file(metadata.len() >= u32::MAX as u64);
            zip.start_file(name, options)?;
            let mut input = File::open(entry.path())?;
            stats.bytes_in += io::copy(&mut input, &mut zip)?;
            stats.files += 1;
        } else {
            warn!("Skipping special file: {}", entry.path().display());
            continue;
        }
        stats.entries += 1;
    }

    let mut writer = zip.finish()?;
    io::Write::flush(&mut writer)?;

    debug!(
        "Wrote {} entries ({} files, {} bytes) to {}",
        stats.entries,
        stats.files,
        stats.bytes_in,
        destination.display()
    );
    Ok(stats)
}

/// Check the archive exists and holds the expected number of entries.
/// Returns the archive size in bytes.
pub fn verify_archive(path: &Path, expected_entries: usize) -> Result<u64> {
    let metadata = match fs::metadata(path) {
        Ok(metadata) if metadata.is_file() => metadata,
        Ok(_) => {
            return Err(Error::ArchiveMissing {
                path: path.to_path_buf(),
            })
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(Error::ArchiveMissing {
                path: path.to_path_buf(),
            })
        }
        Err(e) => return Err(Error::Io(e)),
    };

    let archive = ZipArchive::new(File::open(path)?).map_err(|e| Error::Verification {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    if archive.len() != expected_entries {
        return Err(Error::Verification {
            path: path.to_path_buf(),
            reason: format!(
                "expected {} entries, found {}",
                expected_entries,
                archive.len()
            ),
        });
    }

    Ok(metadata.len())
}

fn root_entry_name(source: &Path) -> io::Result<String> {
    let canonical = fs::canonicalize(source)?;
    Ok(canonical
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| FALLBACK_ROOT_NAME.to_string()))
}

/// Zip entry names always use `/`, whatever the host separator.
fn entry_name(root: &str, relative: &Path) -> String {
    let mut name = root.to_string();
    for component in relative.components() {
        name.push('/');
        name.push_str(&component.as_os_str().to_string_lossy());
    }
    name
}

fn is_same_file(candidate: &Path, destination: &Path) -> bool {
    if candidate.file_name() != destination.file_name() {
        return false;
    }
    fs::canonicalize(candidate)
        .map(|path| path == destination)
        .unwrap_or(false)
}

fn entry_options(options: SimpleFileOptions, metadata: &fs::Metadata) -> SimpleFileOptions {
    let options = match metadata.modified().ok().and_then(zip_timestamp) {
        Some(timestamp) => options.last_modified_time(timestamp),
        None => options,
    };
    with_permissions(options, metadata)
}

/// Zip timestamps are local time and cannot represent dates before 1980.
fn zip_timestamp(modified: SystemTime) -> Option<zip::DateTime> {
    let local: DateTime<Local> = modified.into();
    zip::DateTime::from_date_and_time(
        u16::try_from(local.year()).ok()?,
        local.month() as u8,
        local.day() as u8,
        local.hour() as u8,
        local.minute() as u8,
        local.second() as u8,
    )
    .ok()
}

#[cfg(unix)]
fn with_permissions(options: SimpleFileOptions, metadata: &fs::Metadata) -> SimpleFileOptions {
    use std::os::unix::fs::PermissionsExt;
    options.unix_permissions(metadata.permissions().mode() & 0o7777)
}

#[cfg(not(unix))]
fn with_permissions(options: SimpleFileOptions, _metadata: &fs::Metadata) -> SimpleFileOptions {
    options
}
