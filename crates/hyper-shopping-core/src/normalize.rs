//! Item name normalization
//!
//! Item names are free text ("Peppers red and green", "Milk *3"). Lookups into
//! the lexical base, the category store and the department map all go through
//! the same key so that one spelling of an item always lands on one entry.

use once_cell::sync::Lazy;
use regex::Regex;

/// Separator used between the words of a normalized name
pub const SEPARATOR: &str = "_";

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w]+").expect("valid regex"));

/// Collapse every run of non-word characters into a single `_` and strip
/// separators from both ends.
///
/// Case is preserved; the lexical base lower-cases on its own.
pub fn normalize(text: &str) -> String {
    NON_WORD
        .replace_all(text, SEPARATOR)
        .trim_matches('_')
        .to_string()
}

/// Normalized, lower-cased form used for categories and department keys
pub fn normalize_key(text: &str) -> String {
    normalize(text).to_lowercase()
}
