// src/extractors/matchers.rs
//! Named element matchers.
//!
//! Each financial field is located by "the first element of some kind whose
//! text contains a label". The table here maps a [`FinancialField`] to that
//! pair so callers never hard-code markup shape.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::utils::error::ExtractError;

pub const EARNINGS_LABEL: &str = "Lợi nhuận sau thuế của công ty mẹ";
pub const MARKET_CAP_LABEL: &str = "Vốn hóa thị trường";
pub const REVENUE_LABEL: &str = "Doanh thu bán hàng và CCDV";

static TABLE_ROW_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("tr").expect("Failed to compile TABLE_ROW_SELECTOR")
});

static LIST_ITEM_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("li").expect("Failed to compile LIST_ITEM_SELECTOR")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinancialField {
    Earnings,
    MarketCap,
    Revenue,
}

/// Selects the first element matching `selector` whose full text contains `label`.
#[derive(Debug, Clone)]
pub struct FieldMatcher {
    selector: Selector,
    label: String,
}

impl FieldMatcher {
    #[allow(dead_code)] // custom selectors are only built by tests
    pub fn new(css: &str, label: impl Into<String>) -> Result<Self, ExtractError> {
        let selector = Selector::parse(css).map_err(|e| ExtractError::InvalidSelector {
            selector: css.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { selector, label: label.into() })
    }

    pub fn table_row(label: impl Into<String>) -> Self {
        Self { selector: TABLE_ROW_SELECTOR.clone(), label: label.into() }
    }

    pub fn list_item(label: impl Into<String>) -> Self {
        Self { selector: LIST_ITEM_SELECTOR.clone(), label: label.into() }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// First match in document order, nested elements included.
    pub fn find<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        document
            .select(&self.selector)
            .find(|element| element.text().collect::<String>().contains(&self.label))
    }
}

#[derive(Debug, Clone)]
pub struct MatcherTable {
    earnings: FieldMatcher,
    market_cap: FieldMatcher,
    revenue: FieldMatcher,
}

impl MatcherTable {
    pub fn get(&self, field: FinancialField) -> &FieldMatcher {
        match field {
            FinancialField::Earnings => &self.earnings,
            FinancialField::MarketCap => &self.market_cap,
            FinancialField::Revenue => &self.revenue,
        }
    }

    /// Replaces the matcher for one field.
    #[allow(dead_code)] // only tests swap the matcher table
    pub fn with(mut self, field: FinancialField, matcher: FieldMatcher) -> Self {
        match field {
            FinancialField::Earnings => self.earnings = matcher,
            FinancialField::MarketCap => self.market_cap = matcher,
            FinancialField::Revenue => self.revenue = matcher,
        }
        self
    }
}

impl Default for MatcherTable {
    fn default() -> Self {
        Self {
            earnings: FieldMatcher::table_row(EARNINGS_LABEL),
            market_cap: FieldMatcher::list_item(MARKET_CAP_LABEL),
            revenue: FieldMatcher::table_row(REVENUE_LABEL),
        }
    }
}
