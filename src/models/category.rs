//! Category label normalization
//!
//! Budgets and transactions are linked only through their category label, so
//! every label is canonicalized before it is stored or compared.

/// Canonical display form of a category label
///
/// Trims surrounding whitespace, upper-cases the first character and
/// lower-cases everything after it. Returns an empty string for blank input;
/// callers treat that as a validation failure.
pub fn normalize_category(text: &str) -> String {
    let trimmed = text.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Comparison key for a category label
///
/// Two labels name the same budget iff their keys are equal.
pub fn category_key(text: &str) -> String {
    normalize_category(text).to_lowercase()
}

/// Whether two labels refer to the same category
pub fn same_category(a: &str, b: &str) -> bool {
    category_key(a) == category_key(b)
}
