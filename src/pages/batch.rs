// src/pages/batch.rs
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::companies::ReferenceIndex;
use crate::extractors::{ExtractedRecord, FinancialsExtractor};
use crate::pages::listing::PageFile;
use crate::utils::error::BatchError;

/// What one page produced. Each task hands this back to the join point.
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    Extracted { file_name: String, record: ExtractedRecord },
    Skipped { file_name: String, ranking: i64 },
}

/// Shared, read-only state for every page task.
#[derive(Debug)]
pub struct BatchContext {
    pub references: ReferenceIndex,
    pub extractor: FinancialsExtractor,
}

/// Reads and extracts every page concurrently, at most `max_concurrency` reads in flight.
///
/// A read failure on any page aborts the whole batch: the error is returned
/// and the remaining tasks are cancelled when the join set drops.
pub async fn run_batch(
    pages: Vec<PageFile>,
    context: Arc<BatchContext>,
    max_concurrency: usize,
) -> Result<Vec<PageOutcome>, BatchError> {
    let limiter = Arc::new(Semaphore::new(max_concurrency));
    let mut tasks = JoinSet::new();

    for page in pages {
        let context = Arc::clone(&context);
        let limiter = Arc::clone(&limiter);
        tasks.spawn(async move {
            let _permit = limiter
                .acquire_owned()
                .await
                .map_err(|_| BatchError::LimiterClosed)?;
            process_page(page, &context).await
        });
    }

    let mut outcomes = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        outcomes.push(joined??);
    }

    Ok(outcomes)
}

async fn process_page(page: PageFile, context: &BatchContext) -> Result<PageOutcome, BatchError> {
    let bytes = tokio::fs::read(&page.path).await.map_err(|source| {
        tracing::error!("Error reading file {}: {}", page.file_name, source);
        BatchError::ReadPage {
            path: page.path.clone(),
            source,
        }
    })?;

    let content = String::from_utf8_lossy(&bytes);
    Ok(extract_page(&page, &content, context))
}

/// Matches the page to its reference company and extracts its figures.
pub fn extract_page(page: &PageFile, content: &str, context: &BatchContext) -> PageOutcome {
    let Some(reference) = context.references.get(page.index) else {
        tracing::warn!(
            "Company with ranking {} not found in filtered companies ({})",
            page.index,
            page.file_name
        );
        return PageOutcome::Skipped {
            file_name: page.file_name.clone(),
            ranking: page.index,
        };
    };

    tracing::debug!("Extracting {} for {:?}", page.file_name, reference.company_name);
    PageOutcome::Extracted {
        file_name: page.file_name.clone(),
        record: context.extractor.extract_record(content, reference),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::companies::ReferenceRecord;
    use std::path::Path;

    fn context(rankings: &[(i64, &str)]) -> Arc<BatchContext> {
        let records = rankings
            .iter()
            .map(|(ranking, name)| ReferenceRecord {
                ranking: *ranking,
                company_name: Some(name.to_string()),
                extra: serde_json::Map::new(),
            })
            .collect();
        Arc::new(BatchContext {
            references: ReferenceIndex::from_records(records),
            extractor: FinancialsExtractor::new(),
        })
    }

    fn page_file(dir: &Path, index: i64) -> PageFile {
        let file_name = format!("company_{}.html", index);
        PageFile {
            path: dir.join(&file_name),
            file_name,
            index,
        }
    }

    const REVENUE_PAGE: &str = r#"<html><body><table>
        <tr><td>Doanh thu bán hàng và CCDV</td><td>1,000</td><td>2,000</td></tr>
    </table></body></html>"#;

    #[tokio::test]
    async fn test_unknown_ranking_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("company_5.html"), REVENUE_PAGE).unwrap();
        std::fs::write(dir.path().join("company_9.html"), REVENUE_PAGE).unwrap();

        let pages = vec![page_file(dir.path(), 5), page_file(dir.path(), 9)];
        let mut outcomes = run_batch(pages, context(&[(5, "Công ty A")]), 4).await.unwrap();
        outcomes.sort_by_key(|o| match o {
            PageOutcome::Extracted { record, .. } => record.ranking,
            PageOutcome::Skipped { ranking, .. } => *ranking,
        });

        assert_eq!(outcomes.len(), 2);
        match &outcomes[0] {
            PageOutcome::Extracted { record, .. } => {
                assert_eq!(record.company_name.as_deref(), Some("Công ty A"));
                assert_eq!(record.revenue, vec![Some(1000), Some(2000)], "only the label cell is dropped");
                assert_eq!(record.total_revenue, Some(3000));
            }
            other => panic!("expected extraction, got {:?}", other),
        }
        assert_eq!(
            outcomes[1],
            PageOutcome::Skipped {
                file_name: "company_9.html".to_string(),
                ranking: 9
            }
        );
    }

    #[tokio::test]
    async fn test_read_failure_aborts_batch() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("company_1.html"), REVENUE_PAGE).unwrap();

        // company_2.html is listed but gone by the time it is read.
        let pages = vec![page_file(dir.path(), 1), page_file(dir.path(), 2)];
        let result = run_batch(pages, context(&[(1, "A"), (2, "B")]), 1).await;

        assert!(matches!(result, Err(BatchError::ReadPage { .. })));
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let outcomes = run_batch(Vec::new(), context(&[]), 1).await.unwrap();
        assert!(outcomes.is_empty());
    }

    #[test]
    fn test_extract_page_without_io() {
        let dir = Path::new("company_html");
        let outcome = extract_page(&page_file(dir, 3), "<p>nothing here</p>", &context(&[(3, "C")]));

        match outcome {
            PageOutcome::Extracted { file_name, record } => {
                assert_eq!(file_name, "company_3.html");
                assert_eq!(record.ranking, 3);
                assert!(record.earnings.is_empty());
                assert_eq!(record.total_profit, None);
                assert_eq!(record.total_revenue, Some(0));
                assert_eq!(record.market_cap, None);
            }
            other => panic!("expected extraction, got {:?}", other),
        }
    }
}
