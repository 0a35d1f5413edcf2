/// Phrases that mean the model could not name the product.
pub const UNIDENTIFIABLE_PHRASES: &[&str] = &[
    "i don't know",
    "i do not know",
    "unable to identify",
    "can't identify",
    "cannot identify",
    "could not identify",
    "couldn't identify",
    "not clear",
    "not visible",
    "unclear",
    "not sure",
    "unknown product",
];

/// True when `product` is empty or contains a denylisted phrase
/// (case-insensitive; typographic apostrophes count as `'`).
#[must_use]
pub fn is_unidentifiable(product: &str) -> bool {
    let normalized = product.trim().to_lowercase().replace('\u{2019}', "'");
    normalized.is_empty()
        || UNIDENTIFIABLE_PHRASES
            .iter()
            .any(|phrase| normalized.contains(phrase))
}
