//! Helper functions shared by api/ and webhook/

use crate::consts;

/// Strips every non-digit character from a phone number.
///
/// `+`, spaces, hyphens, parentheses and any other punctuation are
/// removed, leaving the international number as plain digits.
pub fn format_phone_number(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Validates a phone number after normalization.
///
/// The digit count must fall in the Cloud API accepted range.
pub fn is_valid_phone_number(raw: &str) -> bool {
    let digits = format_phone_number(raw);
    (consts::PHONE_MIN_DIGITS..=consts::PHONE_MAX_DIGITS).contains(&digits.len())
}

/// Returns the names of required fields that are absent or blank.
///
/// An empty or whitespace-only string counts as missing, matching the
/// request contract of the send endpoints.
pub fn collect_missing_fields<'a>(fields: &[(&'a str, Option<&str>)]) -> Vec<&'a str> {
    fields
        .iter()
        .filter(|(_, value)| value.is_none_or(|v| v.trim().is_empty()))
        .map(|(name, _)| *name)
        .collect()
}
