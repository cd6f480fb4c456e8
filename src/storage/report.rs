// src/storage/report.rs
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::companies::ReferenceIndex;
use crate::extractors::ExtractedRecord;
use crate::pages::PageOutcome;
use crate::utils::error::StorageError;

/// Number of periods a complete earnings history has.
const FULL_EARNINGS_PERIODS: usize = 4;

/// Keeps the extracted records, sorted ascending by ranking, one per ranking.
///
/// Two pages resolving to the same ranking keep the record from the smallest
/// file name, so the result does not depend on task completion order.
pub fn aggregate(outcomes: Vec<PageOutcome>) -> Vec<ExtractedRecord> {
    let mut extracted: Vec<(String, ExtractedRecord)> = outcomes
        .into_iter()
        .filter_map(|outcome| match outcome {
            PageOutcome::Extracted { file_name, record } => Some((file_name, record)),
            PageOutcome::Skipped { .. } => None,
        })
        .collect();

    extracted.sort_by(|(name_a, a), (name_b, b)| a.ranking.cmp(&b.ranking).then_with(|| name_a.cmp(name_b)));

    let mut records: Vec<ExtractedRecord> = Vec::with_capacity(extracted.len());
    for (file_name, record) in extracted {
        if records.last().is_some_and(|last| last.ranking == record.ranking) {
            tracing::warn!(
                "Ignoring {}: ranking {} already extracted from another page",
                file_name,
                record.ranking
            );
            continue;
        }
        records.push(record);
    }
    records
}

/// One entry per reference company, in reference order, with extracted
/// fields overlaid and `Earnings` folded into a `Full Earnings` flag.
pub fn merge_with_references(
    references: &ReferenceIndex,
    records: &[ExtractedRecord],
) -> Result<Vec<Value>, StorageError> {
    let by_ranking: HashMap<i64, &ExtractedRecord> = records.iter().map(|r| (r.ranking, r)).collect();

    let mut merged = Vec::with_capacity(references.records().len());
    for reference in references.records() {
        let mut entry = into_object(serde_json::to_value(reference)?);

        if let Some(record) = by_ranking.get(&reference.ranking) {
            entry.extend(into_object(serde_json::to_value(record)?));
        }

        let earnings_count = entry
            .remove("Earnings")
            .and_then(|earnings| earnings.as_array().map(Vec::len))
            .unwrap_or(0);
        entry.insert(
            "Full Earnings".to_string(),
            Value::Bool(earnings_count == FULL_EARNINGS_PERIODS),
        );

        merged.push(Value::Object(entry));
    }
    Ok(merged)
}

fn into_object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
