//! Output file naming
//!
//! Builds filesystem-safe names from a row's designated naming fields:
//! NFKD decomposition folds accented letters to their ASCII base, anything
//! that still cannot be represented in the portable filename set is
//! dropped, and whitespace is collapsed.
//!
//! Names are not guaranteed unique across rows; identical names overwrite
//! the earlier row's output file.

use unicode_normalization::UnicodeNormalization;

use crate::sheet::Row;

/// Build the output file name (without extension) for a row.
///
/// Designated fields are rendered in order, empty values omitted, the
/// remainder joined by a single space. Falls back to `row_<n>` when every
/// field is empty.
pub fn build_name(row: &Row, fields: &[String]) -> String {
    let mut parts = Vec::new();
    for field in fields {
        let value = row.value_string(field);
        let folded = fold_portable(value.trim());
        if !folded.is_empty() {
            parts.push(folded);
        }
    }

    if parts.is_empty() {
        format!("row_{}", row.index())
    } else {
        parts.join(" ")
    }
}

/// Fold text to the portable filename character set.
///
/// NFKD decomposes accented characters into base + combining marks; the
/// marks and any other non-ASCII residue are dropped, as is every ASCII
/// character outside letters, digits, space, hyphen, underscore and
/// period. Runs of whitespace left behind collapse to a single space.
pub fn fold_portable(text: &str) -> String {
    let decomposed: String = text.nfkd().collect();

    let kept: String = decomposed
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .filter(|c| {
            c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '_' | '.')
        })
        .collect();

    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}
