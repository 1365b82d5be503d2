//! Singularization for matching plural nouns against catalog vocabulary.
//!
//! Uses the `inflector` crate with a small table of words it gets wrong in a
//! sales context.

use inflector::Inflector;

/// Words inflector mangles or that must not be singularized.
static IRREGULAR: &[(&str, &str)] = &[
    ("people", "person"),
    ("children", "child"),
    ("men", "man"),
    ("women", "woman"),
    ("sales", "sales"),
    ("series", "series"),
    ("news", "news"),
    ("analyses", "analysis"),
    ("criteria", "criterion"),
    ("data", "data"),
    ("indices", "index"),
    ("addresses", "address"),
    ("statuses", "status"),
];

/// Singularize a lowercase word, handling irregulars first then falling back to inflector.
///
/// # Examples
/// ```ignore
/// assert_eq!(singularize("categories"), "category");
/// assert_eq!(singularize("regions"), "region");
/// assert_eq!(singularize("people"), "person");
/// ```
pub fn singularize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }

    if let Some((_, singular)) = IRREGULAR.iter().find(|(plural, _)| *plural == word) {
        return singular.to_string();
    }

    // Digits and dates pass through untouched.
    if !word.chars().all(|c| c.is_alphabetic()) {
        return word.to_string();
    }

    word.to_singular()
}
