//! Plate-text normalization and the extraction result type.

use crate::defaults::{PLATE_MAX_LEN, PLATE_NOT_DETECTED};

/// Outcome of a plate extraction attempt.
///
/// Extraction failure is a distinct state, not a magic string; the literal
/// `NOT_DETECTED` exists only at the flat-file boundary via
/// [`PlateRead::into_csv_field`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlateRead {
    /// A normalized plate string (uppercase, alphanumerics and hyphen,
    /// at most 10 characters).
    Detected(String),
    /// Both extraction tiers failed or yielded no usable characters.
    NotDetected,
}

impl PlateRead {
    /// Render the value the flat file stores in the `matricula` column.
    pub fn into_csv_field(self) -> String {
        match self {
            PlateRead::Detected(text) => text,
            PlateRead::NotDetected => PLATE_NOT_DETECTED.to_string(),
        }
    }
}

/// Normalize raw extractor output into a plate string.
///
/// Vision models sometimes wrap the plate in commentary ("the plate is
/// abc-123"). A reply of three or more whitespace-separated tokens where
/// exactly one token carries a digit is treated as commentary around the
/// plate, and that token alone is kept. Shorter replies, and replies whose
/// digits span several tokens (typical OCR noise like "AB C 12 3"), are used
/// whole. The chosen text is then uppercased, stripped of whitespace,
/// filtered to ASCII alphanumerics and `-`, and truncated to 10 characters.
///
/// Returns `None` when nothing usable remains.
pub fn normalize(raw: &str) -> Option<String> {
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    let mut digit_tokens = tokens
        .iter()
        .filter(|token| token.chars().any(|c| c.is_ascii_digit()));
    let candidate = match (tokens.len(), digit_tokens.next(), digit_tokens.next()) {
        (3.., Some(token), None) => *token,
        _ => raw,
    };

    let cleaned: String = candidate
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .take(PLATE_MAX_LEN)
        .collect();

    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Normalize, mapping an unusable reply to [`PlateRead::NotDetected`].
pub fn normalize_read(raw: &str) -> PlateRead {
    match normalize(raw) {
        Some(text) => PlateRead::Detected(text),
        None => PlateRead::NotDetected,
    }
}
