//! Shared string helpers.

use std::collections::HashSet;

/// Delimiter between varieties in a recommendation field.
pub const VARIETY_DELIMITER: char = ';';

/// Normalize a category value for matching: trimmed and lowercased.
///
/// Normalized values are only ever compared, never displayed.
#[inline]
pub fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// First delimited token of a recommendation field, trimmed.
///
/// An empty field yields an empty string.
pub fn primary_variety(recommendation: &str) -> String {
    recommendation
        .split(VARIETY_DELIMITER)
        .next()
        .unwrap_or("")
        .trim()
        .to_string()
}

/// Whether a value is blank (empty after trimming).
#[inline]
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Distinct non-blank values in first-seen order.
pub fn distinct_non_blank<'a, I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|v| !is_blank(v))
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}
