// src/storage/mod.rs
pub mod report;

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::companies::ReferenceIndex;
use crate::extractors::ExtractedRecord;
use crate::utils::error::StorageError;

pub use report::{aggregate, merge_with_references};

pub struct StorageManager {
    report_path: PathBuf,
    merged_path: Option<PathBuf>,
}

impl StorageManager {
    /// Creates a StorageManager writing the report to `report_path` and,
    /// when given, the merged company list to `merged_path`.
    pub fn new<P: AsRef<Path>>(report_path: P, merged_path: Option<PathBuf>) -> Self {
        Self {
            report_path: report_path.as_ref().to_path_buf(),
            merged_path,
        }
    }

    /// Saves the sorted extraction report, replacing any previous one.
    pub fn save_report(&self, records: &[ExtractedRecord]) -> Result<&Path, StorageError> {
        write_json_atomic(&self.report_path, records)?;
        tracing::debug!("Saved {} records to {}", records.len(), self.report_path.display());
        Ok(self.report_path.as_path())
    }

    /// Saves the reference list merged with the extracted figures, if configured.
    pub fn save_merged(
        &self,
        references: &ReferenceIndex,
        records: &[ExtractedRecord],
    ) -> Result<Option<&Path>, StorageError> {
        let Some(path) = &self.merged_path else {
            return Ok(None);
        };

        let merged = merge_with_references(references, records)?;
        write_json_atomic(path, merged.as_slice())?;
        tracing::debug!("Saved {} merged companies to {}", merged.len(), path.display());
        Ok(Some(path.as_path()))
    }
}

/// Pretty-prints `value` into a sibling temp file, then renames it over `path`.
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StorageError> {
    let io_error = |source| StorageError::IoError {
        path: path.to_path_buf(),
        source,
    };

    let json = serde_json::to_string_pretty(value)?;

    // Create the parent directory if it doesn't exist
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
    }

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    fs::write(&tmp_path, json).map_err(io_error)?;
    if let Err(source) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(io_error(source));
    }
    Ok(())
}
