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

//! Error types for chroma-backup

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for backup operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Could not create backup directory {path}")]
    BackupDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Source directory not found: {path}")]
    SourceMissing { path: PathBuf },

    #[error("Source path is not a directory: {path}")]
    SourceNotDirectory { path: PathBuf },

    #[error("Source directory is not readable: {path}")]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Compression failed for {path}")]
    Compression {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Archive was not produced: {path}")]
    ArchiveMissing { path: PathBuf },

    #[error("Archive verification failed for {path}: {reason}")]
    Verification { path: PathBuf, reason: String },

    #[error("Invalid configuration: {reason}")]
    Configuration { reason: String },
}

/// Result type alias for backup operations
pub type Result<T> = std::result::Result<T, Error>;
