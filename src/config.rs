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

//! Backup configuration.
//!
//! Values are resolved in layers: built-in defaults, then an optional TOML
//! file, then overrides coming from the command line or the environment.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_SOURCE_DIR: &str = "chroma_db";
pub const DEFAULT_BACKUP_DIR: &str = "backups";
pub const DEFAULT_ARCHIVE_PREFIX: &str = "fallout_wiki_backup";
pub const DEFAULT_COMPRESSION_LEVEL: i64 = 9;
pub const DEFAULT_CLEANUP_THRESHOLD: usize = 5;

/// Level range accepted by the Deflate encoder
pub const MIN_COMPRESSION_LEVEL: i64 = 1;
pub const MAX_COMPRESSION_LEVEL: i64 = 9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackupConfig {
    pub source_dir: PathBuf,
    pub backup_dir: PathBuf,
    pub archive_prefix: String,
    pub compression_level: i64,
    /// More archives than this in the backup directory triggers a cleanup hint
    pub cleanup_threshold: usize,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from(DEFAULT_SOURCE_DIR),
            backup_dir: PathBuf::from(DEFAULT_BACKUP_DIR),
            archive_prefix: DEFAULT_ARCHIVE_PREFIX.to_string(),
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            cleanup_threshold: DEFAULT_CLEANUP_THRESHOLD,
        }
    }
}

/// Values supplied on the command line (or through their environment variables)
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub source_dir: Option<PathBuf>,
    pub backup_dir: Option<PathBuf>,
    pub archive_prefix: Option<String>,
    pub compression_level: Option<i64>,
    pub cleanup_threshold: Option<usize>,
}

impl BackupConfig {
    /// Load the configuration file if one is given, otherwise use defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                debug!("Loading configuration from {}", path.display());
                let content = fs::read_to_string(path).map_err(|e| Error::Configuration {
                    reason: format!("Failed to read {}: {}", path.display(), e),
                })?;
                Self::from_toml(&content)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(source_dir) = overrides.source_dir {
            self.source_dir = source_dir;
        }
        if let Some(backup_dir) = overrides.backup_dir {
            self.backup_dir = backup_dir;
        }
        if let Some(prefix) = overrides.archive_prefix {
            self.archive_prefix = prefix;
        }
        if let Some(level) = overrides.compression_level {
            self.compression_level = level;
        }
        if let Some(threshold) = overrides.cleanup_threshold {
            self.cleanup_threshold = threshold;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.archive_prefix.is_empty() {
            return Err(Error::Configuration {
                reason: "archive prefix must not be empty".to_string(),
            });
        }
        if self.archive_prefix.contains(['/', '\\']) {
            return Err(Error::Configuration {
                reason: format!(
                    "archive prefix must not contain path separators: {}",
                    self.archive_prefix
                ),
            });
        }
        if !(MIN_COMPRESSION_LEVEL..=MAX_COMPRESSION_LEVEL).contains(&self.compression_level) {
            return Err(Error::Configuration {
                reason: format!(
                    "compression level must be between {} and {}, got {}",
                    MIN_COMPRESSION_LEVEL, MAX_COMPRESSION_LEVEL, self.compression_level
                ),
            });
        }
        Ok(())
    }
}
