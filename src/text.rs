//! Text helpers for failure messages.

use serde::Deserialize;

/// How two characters are compared.
///
/// Culture-aware variants use Unicode case mapping without locale tailoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextComparison {
    #[default]
    CurrentCulture,
    CurrentCultureIgnoreCase,
    Ordinal,
    OrdinalIgnoreCase,
}

impl TextComparison {
    pub fn chars_equal(self, left: char, right: char) -> bool {
        match self {
            TextComparison::CurrentCulture | TextComparison::Ordinal => left == right,
            TextComparison::CurrentCultureIgnoreCase => {
                left.to_lowercase().eq(right.to_lowercase())
            }
            TextComparison::OrdinalIgnoreCase => left.to_uppercase().eq(right.to_uppercase()),
        }
    }

    /// Whole-string equality, char by char.
    pub fn equals(self, left: &str, right: &str) -> bool {
        left.chars().count() == right.chars().count()
            && first_mismatch_index(left, right, self).is_none()
    }
}

/// First char index where `value` stops matching `expected`, or where `value`
/// runs past the end of `expected`. `None` when `value` is a prefix of, or equal
/// to, `expected`.
pub fn first_mismatch_index(
    value: &str,
    expected: &str,
    comparison: TextComparison,
) -> Option<usize> {
    let mut expected_chars = expected.chars();
    value
        .chars()
        .enumerate()
        .find_map(|(index, actual)| match expected_chars.next() {
            Some(wanted) if comparison.chars_equal(actual, wanted) => None,
            _ => Some(index),
        })
}

pub fn first_mismatch_index_default(value: &str, expected: &str) -> Option<usize> {
    first_mismatch_index(value, expected, TextComparison::default())
}

/// Up to three quoted chars starting at `index`, e.g. `"ell" (index 1)`.
pub fn context_window(value: &str, index: usize) -> String {
    let segment: String = value.chars().skip(index).take(3).collect();
    format!("\"{segment}\" (index {index})")
}
