//! Request and response bodies exchanged with the analysis endpoints, and the
//! persisted analysis record.

use serde::{Deserialize, Deserializer, Serialize};

/// Decode `null` (or an absent field, with `#[serde(default)]`) as `T::default()`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Image shown when a record has no usable image reference.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

/// Reference to the uploaded product image: a remote URL, a relative path, or a data URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    /// Wrap an image reference.
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// Borrow the raw reference.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for inline `data:` references.
    #[must_use]
    pub fn is_data_url(&self) -> bool {
        self.0.starts_with("data:")
    }

    /// True for references that need no network check (data URLs and relative paths).
    #[must_use]
    pub fn is_local(&self) -> bool {
        self.is_data_url() || self.0.starts_with('/')
    }

    /// Returns `image` if present and non-empty, else the placeholder.
    #[must_use]
    pub fn or_placeholder(image: Option<&Self>) -> Self {
        match image {
            Some(i) if !i.0.trim().is_empty() => i.clone(),
            _ => Self::new(PLACEHOLDER_IMAGE),
        }
    }
}

impl std::fmt::Display for ImageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// An ingredient flagged as unsafe during pregnancy.
///
/// Model output is loose: a missing or `null` name or reason reads as empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarmfulIngredient {
    /// Ingredient name as returned by the analysis.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Why it is considered harmful.
    #[serde(default, deserialize_with = "null_as_default")]
    pub reason: String,
}

/// Body for the identify-from-image endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifyRequest {
    /// Image to identify.
    pub image_url: ImageRef,
}

/// Response from the identify-from-image endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifyResponse {
    /// Identified brand and product name.
    #[serde(default)]
    pub product: Option<String>,
    /// Structured "could not identify" signal from the backend.
    #[serde(default)]
    pub unidentifiable: Option<bool>,
}

/// Body for the find-ingredients endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientsRequest {
    /// Product to look up.
    pub product_name: String,
}

/// Response from the find-ingredients endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientsResponse {
    /// Ordered ingredient list; may contain duplicates.
    #[serde(default)]
    pub ingredients: Vec<String>,
    /// The product contains alcohol.
    #[serde(default)]
    pub contains_alcohol: bool,
    /// Human-readable alcohol warning.
    #[serde(default)]
    pub alcohol_warning: Option<String>,
    /// The product is a food rather than a cosmetic.
    #[serde(default)]
    pub is_food: Option<bool>,
}

/// Body for the analyze-ingredients endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    /// Ingredients to classify.
    pub ingredients: Vec<String>,
    /// Product the ingredients belong to.
    pub product_name: String,
    /// Whether the product is a food.
    pub is_food: bool,
}

/// Safety classification returned by the analyze-ingredients endpoint.
///
/// Any JSON object decodes. A missing or `null` `isSafe` reads as unsafe and
/// sets `parsing_error`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "SafetyReportWire")]
pub struct SafetyReport {
    /// Ingredients flagged as harmful.
    #[serde(default)]
    pub harmful_ingredients: Vec<HarmfulIngredient>,
    /// Overall verdict.
    #[serde(default)]
    pub is_safe: bool,
    /// The backend could not parse the model output and fell back to a default verdict.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parsing_error: Option<bool>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SafetyReportWire {
    #[serde(default, deserialize_with = "null_as_default")]
    harmful_ingredients: Vec<HarmfulIngredient>,
    #[serde(default)]
    is_safe: Option<bool>,
    #[serde(default)]
    parsing_error: Option<bool>,
}

impl From<SafetyReportWire> for SafetyReport {
    fn from(wire: SafetyReportWire) -> Self {
        match wire.is_safe {
            Some(is_safe) => Self {
                harmful_ingredients: wire.harmful_ingredients,
                is_safe,
                parsing_error: wire.parsing_error,
            },
            None => Self {
                harmful_ingredients: wire.harmful_ingredients,
                is_safe: false,
                parsing_error: Some(true),
            },
        }
    }
}

/// Persisted analysis record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Unique identifier.
    pub id: String,
    /// RFC 3339 creation timestamp.
    pub timestamp: String,
    /// Product name.
    pub product: String,
    /// Image reference (URL or data URL).
    pub image_url: ImageRef,
    /// Ordered ingredient list; may contain duplicates.
    pub ingredients: Vec<String>,
    /// Ingredients flagged as harmful.
    pub harmful_ingredients: Vec<HarmfulIngredient>,
    /// Overall verdict.
    pub is_safe: bool,
    /// The analysis fell back after a parsing problem.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parsing_error: Option<bool>,
    /// The product is a food.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_food: Option<bool>,
}
