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

//! Backup statistics and their human-readable rendering.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const MEBIBYTE: f64 = 1024.0 * 1024.0;

/// Statistics for a completed backup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupReport {
    pub archive_path: PathBuf,
    pub source_path: PathBuf,
    pub created_at: DateTime<Local>,
    pub file_count: usize,
    pub source_size: u64,
    pub archive_size: u64,
    /// Archive size as a percentage of the source size; `None` for an empty source
    pub compression_ratio: Option<f64>,
    pub duration_ms: u64,
}

impl BackupReport {
    pub fn ratio_display(&self) -> String {
        format_ratio(self.compression_ratio)
    }
}

/// `archive / source * 100`, rounded to one decimal place.
pub fn compression_ratio(archive_size: u64, source_size: u64) -> Option<f64> {
    if source_size == 0 {
        return None;
    }
    let ratio = archive_size as f64 / source_size as f64 * 100.0;
    Some((ratio * 10.0).round() / 10.0)
}

pub fn format_ratio(ratio: Option<f64>) -> String {
    match ratio {
        Some(ratio) => format!("{:.1}%", ratio),
        None => "n/a".to_string(),
    }
}

/// Binary-unit size with at most two decimals, trailing zeros dropped.
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        return format!("{} {}", bytes, UNITS[0]);
    }

    let rounded = format!("{:.2}", size);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit_index])
}

/// Size in mebibytes with two decimals, as shown in the history table.
pub fn format_megabytes(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / MEBIBYTE)
}
