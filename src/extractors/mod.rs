// src/extractors/mod.rs
pub mod financials;
pub mod matchers;
pub mod numbers;

// Re-export key extraction types for convenience
#[allow(unused_imports)]
pub use financials::{ExtractedRecord, Financials, FinancialsExtractor};
#[allow(unused_imports)]
pub use matchers::{FieldMatcher, FinancialField, MatcherTable};
