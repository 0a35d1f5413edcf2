//! Canned backend answers shared by the mock transports, tests and demos.

pub mod pages;
pub mod products;

use safemom_core::TransportResponse;

/// `200` JSON body from the identify route.
#[must_use]
pub fn identify_ok(product: &str) -> TransportResponse {
    TransportResponse::json(200, &serde_json::json!({ "product": product }))
}

/// `200` JSON body from the identify route carrying the structured "cannot identify" flag.
#[must_use]
pub fn identify_unidentifiable() -> TransportResponse {
    TransportResponse::json(
        200,
        &serde_json::json!({ "product": "", "unidentifiable": true }),
    )
}

/// `200` JSON body from the find-ingredients route.
#[must_use]
pub fn ingredients_ok(
    ingredients: &[&str],
    contains_alcohol: bool,
    alcohol_warning: Option<&str>,
    is_food: bool,
) -> TransportResponse {
    let mut body = serde_json::json!({
        "ingredients": ingredients,
        "containsAlcohol": contains_alcohol,
        "isFood": is_food,
    });
    if let Some(w) = alcohol_warning {
        body["alcoholWarning"] = serde_json::Value::from(w);
    }
    TransportResponse::json(200, &body)
}

/// `200` JSON body from the analyze route.
#[must_use]
pub fn analysis_ok(harmful: &[(&str, &str)], is_safe: bool) -> TransportResponse {
    let harmful: Vec<serde_json::Value> = harmful
        .iter()
        .map(|(name, reason)| serde_json::json!({ "name": name, "reason": reason }))
        .collect();
    TransportResponse::json(
        200,
        &serde_json::json!({ "harmfulIngredients": harmful, "isSafe": is_safe }),
    )
}

/// JSON error body `{ "error": message }` with the given status.
#[must_use]
pub fn json_error(status: u16, message: &str) -> TransportResponse {
    TransportResponse::json(status, &serde_json::json!({ "error": message }))
}

/// JSON content type with a body that is not JSON.
#[must_use]
pub fn garbage(status: u16) -> TransportResponse {
    let body = b"{\"product\": \"Cera".to_vec();
    TransportResponse {
        status,
        content_type: Some("application/json".to_string()),
        content_length: Some(body.len() as u64),
        redirected: false,
        body,
    }
}
