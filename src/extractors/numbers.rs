// src/extractors/numbers.rs
use once_cell::sync::Lazy;
use regex::Regex;

static LEADING_INT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?\d+").expect("Failed to compile LEADING_INT_RE")
});

static LEADING_FLOAT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").expect("Failed to compile LEADING_FLOAT_RE")
});

/// Trims and drops thousands separators. Returns `None` for blank text.
pub fn clean_fragment(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.replace(',', ""))
}

/// Parses the integer prefix of `text`: `"12.5"` is 12, `"-300 tỷ"` is -300.
pub fn parse_leading_int(text: &str) -> Option<i64> {
    let m = LEADING_INT_RE.find(text.trim_start())?;
    m.as_str().parse().ok()
}

/// Parses the decimal prefix of `text`, exponent allowed.
pub fn parse_leading_float(text: &str) -> Option<f64> {
    let m = LEADING_FLOAT_RE.find(text.trim_start())?;
    m.as_str().parse().ok()
}

/// Saturating sum of the cells; `None` as soon as one cell is not a number.
pub fn row_total(values: &[Option<i64>]) -> Option<i64> {
    values
        .iter()
        .try_fold(0i64, |acc, v| v.map(|v| acc.saturating_add(v)))
}
