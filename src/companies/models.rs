// src/companies/models.rs
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One entry of the pre-filtered company list.
/// Example: `{"Ranking": 5, "CompanyName": "...", "NopNganSach": 1234, "Link": "...", ...}`
///
/// Only `Ranking` and `CompanyName` drive extraction; everything else is
/// carried along untouched so the merged report can echo it back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReferenceRecord {
    pub ranking: i64,
    #[serde(default)]
    pub company_name: Option<String>, // upstream lists sometimes carry null
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Read-only lookup of reference records by ranking.
#[derive(Debug, Default)]
pub struct ReferenceIndex {
    records: Vec<ReferenceRecord>,
    by_ranking: HashMap<i64, usize>,
}

impl ReferenceIndex {
    /// Builds the index. When a ranking repeats, the first occurrence wins.
    pub fn from_records(records: Vec<ReferenceRecord>) -> Self {
        let mut by_ranking = HashMap::with_capacity(records.len());
        for (pos, record) in records.iter().enumerate() {
            if by_ranking.contains_key(&record.ranking) {
                tracing::warn!(
                    "Duplicate ranking {} in reference list ({:?}), keeping the first entry",
                    record.ranking,
                    record.company_name
                );
                continue;
            }
            by_ranking.insert(record.ranking, pos);
        }
        Self { records, by_ranking }
    }

    pub fn get(&self, ranking: i64) -> Option<&ReferenceRecord> {
        self.by_ranking.get(&ranking).map(|&pos| &self.records[pos])
    }

    /// All records in file order, duplicates included.
    pub fn records(&self) -> &[ReferenceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.by_ranking.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ranking: i64, name: &str) -> ReferenceRecord {
        ReferenceRecord {
            ranking,
            company_name: Some(name.to_string()),
            extra: serde_json::Map::new(),
        }
    }

    #[test]
    fn test_first_duplicate_wins() {
        let index = ReferenceIndex::from_records(vec![
            record(1, "Alpha"),
            record(2, "Beta"),
            record(1, "Alpha again"),
        ]);

        assert_eq!(index.len(), 2);
        assert_eq!(index.get(1).and_then(|r| r.company_name.as_deref()), Some("Alpha"));
        assert_eq!(index.records().len(), 3, "file order view keeps every row");
        assert!(index.get(3).is_none());
    }

    #[test]
    fn test_null_company_name_round_trips() {
        let parsed: ReferenceRecord =
            serde_json::from_str(r#"{"Ranking": 3, "CompanyName": null}"#).unwrap();
        let value = serde_json::to_value(&parsed).unwrap();
        assert_eq!(value, serde_json::json!({"Ranking": 3, "CompanyName": null}));
    }

    #[test]
    fn test_deserialize_keeps_unknown_fields() {
        let json = r#"{"Ranking": 7, "CompanyName": null, "NopNganSach": 1500, "Link": "abc.chn"}"#;
        let parsed: ReferenceRecord = serde_json::from_str(json).unwrap();

        assert_eq!(parsed.ranking, 7);
        assert_eq!(parsed.company_name, None);
        assert_eq!(parsed.extra.get("NopNganSach"), Some(&serde_json::json!(1500)));
        assert_eq!(parsed.extra.get("Link"), Some(&serde_json::json!("abc.chn")));
    }
}
