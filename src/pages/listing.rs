// src/pages/listing.rs
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

use crate::utils::error::BatchError;

static PAGE_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^company_(\d+)\.html$").expect("Failed to compile PAGE_NAME_RE")
});

/// A saved company page admitted by the naming convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFile {
    pub path: PathBuf,
    pub file_name: String,
    pub index: i64,
}

/// Ranking index encoded in `company_<N>.html`, or `None` for any other name.
pub fn parse_page_index(file_name: &str) -> Option<i64> {
    let caps = PAGE_NAME_RE.captures(file_name)?;
    match caps[1].parse::<i64>() {
        Ok(index) => Some(index),
        Err(_) => {
            tracing::warn!("Ignoring {}: ranking index out of range", file_name);
            None
        }
    }
}

/// Lists the company pages in `dir`, sorted by file name.
pub async fn list_pages(dir: &Path) -> Result<Vec<PageFile>, BatchError> {
    let read_dir_error = |source| BatchError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = tokio::fs::read_dir(dir).await.map_err(read_dir_error)?;
    let mut pages = Vec::new();

    while let Some(entry) = entries.next_entry().await.map_err(read_dir_error)? {
        let Some(file_name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        let Some(index) = parse_page_index(&file_name) else {
            tracing::trace!("Skipping non-page entry {}", file_name);
            continue;
        };
        // Follows symlinks; a dangling link fails here like an unreadable page would.
        let path = entry.path();
        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|source| BatchError::ReadPage {
                path: path.clone(),
                source,
            })?;
        if !metadata.is_file() {
            tracing::debug!("Skipping {}: not a regular file", file_name);
            continue;
        }

        pages.push(PageFile {
            path,
            file_name,
            index,
        });
    }

    pages.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    tracing::debug!("Found {} company pages in {}", pages.len(), dir.display());
    Ok(pages)
}
