//! Deterministic product catalogue used by [`crate::MockBackend`].

/// One catalogue entry.
#[derive(Debug, Clone, Copy)]
pub struct Product {
    /// Substring matched (case-insensitively) against the image reference.
    pub image_hint: &'static str,
    /// Brand and product name.
    pub name: &'static str,
    /// Ordered ingredient list.
    pub ingredients: &'static [&'static str],
    /// Alcohol warning, for alcoholic products.
    pub alcohol_warning: Option<&'static str>,
    /// Food rather than cosmetic.
    pub is_food: bool,
}

/// Ingredients flagged as harmful, with the reason returned by the analyzer.
pub const HARMFUL: &[(&str, &str)] = &[
    (
        "Retinol",
        "Vitamin A derivatives are linked to birth defects in high doses.",
    ),
    (
        "Salicylic Acid",
        "High-dose salicylic acid is related to aspirin and best avoided during pregnancy.",
    ),
    (
        "Hydroquinone",
        "A large share is absorbed through the skin; avoid during pregnancy.",
    ),
    (
        "Oxybenzone",
        "A chemical sunscreen filter with possible hormone-disrupting effects.",
    ),
];

/// The catalogue.
pub const PRODUCTS: &[Product] = &[
    Product {
        image_hint: "cerave",
        name: "CeraVe Moisturizing Cream",
        ingredients: &["Water", "Glycerin", "Ceramides"],
        alcohol_warning: None,
        is_food: false,
    },
    Product {
        image_hint: "retinol",
        name: "The Ordinary Retinol 1% in Squalane",
        ingredients: &["Squalane", "Caprylic/Capric Triglyceride", "Retinol", "Solanum Lycopersicum (Tomato) Fruit Extract"],
        alcohol_warning: None,
        is_food: false,
    },
    Product {
        image_hint: "wine",
        name: "Red Wine",
        ingredients: &["Water", "Ethanol"],
        alcohol_warning: Some("This product contains alcohol. Alcohol consumption during pregnancy can harm the baby."),
        is_food: true,
    },
    Product {
        image_hint: "oats",
        name: "Quaker Old Fashioned Oats",
        ingredients: &["Whole Grain Rolled Oats"],
        alcohol_warning: None,
        is_food: true,
    },
];

/// Entry whose hint appears in `image`.
#[must_use]
pub fn by_image(image: &str) -> Option<&'static Product> {
    let image = image.to_lowercase();
    PRODUCTS.iter().find(|p| image.contains(p.image_hint))
}

/// Entry with the given product name (case-insensitive).
#[must_use]
pub fn by_name(name: &str) -> Option<&'static Product> {
    PRODUCTS.iter().find(|p| p.name.eq_ignore_ascii_case(name.trim()))
}

/// Harmful entries among `ingredients`, in ingredient order.
#[must_use]
pub fn harmful_in(ingredients: &[String]) -> Vec<(&'static str, &'static str)> {
    ingredients
        .iter()
        .filter_map(|i| HARMFUL.iter().find(|(name, _)| name.eq_ignore_ascii_case(i)))
        .copied()
        .collect()
}
