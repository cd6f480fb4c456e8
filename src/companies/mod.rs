// src/companies/mod.rs
pub mod models;

use std::path::Path;

use crate::utils::error::ReferenceError;
pub use models::{ReferenceIndex, ReferenceRecord};

/// Loads the pre-filtered company list (a JSON array) fully into memory.
pub async fn load_reference_index(path: &Path) -> Result<ReferenceIndex, ReferenceError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ReferenceError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let records: Vec<ReferenceRecord> =
        serde_json::from_str(&raw).map_err(|source| ReferenceError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let index = ReferenceIndex::from_records(records);
    tracing::debug!("Loaded {} reference companies from {}", index.len(), path.display());
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_reference_index() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filtered_companies.json");
        std::fs::write(
            &path,
            r#"[
                {"Ranking": 1, "CompanyName": "Công ty A", "Industry": "Bank"},
                {"Ranking": 2, "CompanyName": "Công ty B"}
            ]"#,
        )
        .unwrap();

        let index = tokio_test::block_on(load_reference_index(&path)).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.get(2).unwrap().company_name.as_deref(), Some("Công ty B"));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = tokio_test::block_on(load_reference_index(&dir.path().join("nope.json")));
        assert!(matches!(result, Err(ReferenceError::Read { .. })));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filtered_companies.json");
        std::fs::write(&path, r#"{"Ranking": 1}"#).unwrap();

        let result = tokio_test::block_on(load_reference_index(&path));
        assert!(matches!(result, Err(ReferenceError::Parse { .. })));
    }
}
