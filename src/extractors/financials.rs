// src/extractors/financials.rs

// --- Imports ---
use scraper::{node::Node, ElementRef, Html};
use serde::Serialize;

use crate::companies::ReferenceRecord;
use crate::extractors::matchers::{FinancialField, MatcherTable};
use crate::extractors::numbers::{clean_fragment, parse_leading_float, parse_leading_int, row_total};

// --- Data Structures ---

/// One company's figures as written to the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExtractedRecord {
    pub ranking: i64,
    pub company_name: Option<String>,
    pub earnings: Vec<Option<i64>>, // null entries are non-numeric cells
    pub total_profit: Option<i64>,  // null when no earnings row exists
    pub market_cap: Option<f64>,
    pub revenue: Vec<Option<i64>>,
    pub total_revenue: Option<i64>, // 0 when no revenue row exists
}

/// Figures pulled out of a single page, before they are tied to a company.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Financials {
    pub earnings: Vec<Option<i64>>,
    pub total_profit: Option<i64>,
    pub market_cap: Option<f64>,
    pub revenue: Vec<Option<i64>>,
    pub total_revenue: Option<i64>,
}

impl Financials {
    pub fn into_record(self, reference: &ReferenceRecord) -> ExtractedRecord {
        ExtractedRecord {
            ranking: reference.ranking,
            company_name: reference.company_name.clone(),
            earnings: self.earnings,
            total_profit: self.total_profit,
            market_cap: self.market_cap,
            revenue: self.revenue,
            total_revenue: self.total_revenue,
        }
    }
}

// --- Main Extractor Structure ---
#[derive(Debug, Clone, Default)]
pub struct FinancialsExtractor {
    matchers: MatcherTable,
}

impl FinancialsExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(dead_code)] // only tests swap the matcher table
    pub fn with_matchers(matchers: MatcherTable) -> Self {
        Self { matchers }
    }

    /// Parses `html_content` and extracts earnings, market cap and revenue.
    /// Missing targets fall back to their defaults; this never fails.
    pub fn extract(&self, html_content: &str) -> Financials {
        let document = Html::parse_document(html_content);

        let mut financials = Financials::default();

        // Earnings: total stays null unless the row exists.
        if let Some(earnings) = self.row_values(&document, FinancialField::Earnings) {
            financials.total_profit = row_total(&earnings);
            financials.earnings = earnings;
        }

        financials.market_cap = self.market_cap(&document);

        // Revenue: total is always present, 0 without a row.
        financials.revenue = self
            .row_values(&document, FinancialField::Revenue)
            .unwrap_or_default();
        financials.total_revenue = row_total(&financials.revenue);

        tracing::trace!(
            "Extracted {} earnings, {} revenue values, market cap {:?}",
            financials.earnings.len(),
            financials.revenue.len(),
            financials.market_cap
        );
        financials
    }

    pub fn extract_record(&self, html_content: &str, reference: &ReferenceRecord) -> ExtractedRecord {
        self.extract(html_content).into_record(reference)
    }

    /// Values of the labelled row, first cell dropped. `None` if no row matches.
    /// A cell without a leading integer keeps its position as `None`.
    fn row_values(&self, document: &Html, field: FinancialField) -> Option<Vec<Option<i64>>> {
        let matcher = self.matchers.get(field);
        let row = matcher.find(document)?;
        tracing::debug!("Found {:?} row for label '{}'", field, matcher.label());

        let values = row_cell_texts(row)
            .into_iter()
            .skip(1) // label cell
            .map(|text| {
                let value = parse_leading_int(&text);
                if value.is_none() {
                    tracing::warn!("Non-numeric {:?} cell '{}' recorded as null", field, text);
                }
                value
            })
            .collect();
        Some(values)
    }

    /// Second text fragment of the labelled list item, as a float.
    fn market_cap(&self, document: &Html) -> Option<f64> {
        let matcher = self.matchers.get(FinancialField::MarketCap);
        let item = matcher.find(document)?;

        let fragments: Vec<String> = item
            .children()
            .filter_map(|node| match node.value() {
                Node::Text(text) => clean_fragment(text),
                Node::Element(_) => {
                    ElementRef::wrap(node).and_then(|el| clean_fragment(&el.text().collect::<String>()))
                }
                _ => None, // comments and processing instructions are not fragments
            })
            .collect();

        // The first fragment echoes the label.
        let Some(value_text) = fragments.get(1) else {
            tracing::warn!(
                "Market cap element has {} text fragment(s), expected at least 2",
                fragments.len()
            );
            return None;
        };

        let value = parse_leading_float(value_text);
        if value.is_none() {
            tracing::warn!("Market cap fragment '{}' is not a number", value_text);
        }
        value
    }
}

/// Cleaned, non-empty text of the row's direct `td` children, in order.
fn row_cell_texts(row: ElementRef) -> Vec<String> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|cell| cell.value().name() == "td")
        .filter_map(|cell| clean_fragment(&cell.text().collect::<String>()))
        .collect()
}
