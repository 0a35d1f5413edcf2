use safemom_types::{
    AnalysisResult, HarmfulIngredient, IdentifyResponse, ImageRef, IngredientsResponse,
    SafetyReport, SavedSearches,
};

fn record(id: &str) -> AnalysisResult {
    AnalysisResult {
        id: id.to_string(),
        timestamp: "2026-10-17T09:00:00Z".to_string(),
        product: "CeraVe Moisturizing Cream".to_string(),
        image_url: ImageRef::new("https://cdn.example/cream.jpg"),
        ingredients: vec!["Water".into(), "Glycerin".into(), "Water".into()],
        harmful_ingredients: vec![],
        is_safe: true,
        parsing_error: None,
        is_food: Some(false),
    }
}

#[test]
fn analysis_result_uses_camel_case_keys() {
    let json = serde_json::to_value(record("a")).expect("serialize record");

    assert_eq!(json["imageUrl"], "https://cdn.example/cream.jpg");
    assert_eq!(json["harmfulIngredients"], serde_json::json!([]));
    assert_eq!(json["isSafe"], true);
    assert_eq!(json["isFood"], false);
    assert!(json.get("parsingError").is_none());
    // duplicates are preserved in order
    assert_eq!(json["ingredients"], serde_json::json!(["Water", "Glycerin", "Water"]));
}

#[test]
fn ingredients_response_defaults_missing_fields() {
    let de: IngredientsResponse =
        serde_json::from_str(r#"{"ingredients":["Water","Ethanol"],"containsAlcohol":true}"#)
            .expect("deserialize ingredients");

    assert_eq!(de.ingredients, vec!["Water", "Ethanol"]);
    assert!(de.contains_alcohol);
    assert_eq!(de.alcohol_warning, None);
    assert_eq!(de.is_food, None);
}

#[test]
fn identify_response_accepts_structured_flag() {
    let de: IdentifyResponse =
        serde_json::from_str(r#"{"unidentifiable":true}"#).expect("deserialize identify");
    assert_eq!(de.product, None);
    assert_eq!(de.unidentifiable, Some(true));
}

#[test]
fn safety_report_reads_backend_shape() {
    let de: SafetyReport = serde_json::from_str(
        r#"{"harmfulIngredients":[{"name":"Retinol","reason":"Vitamin A derivative"}],"isSafe":false,"parsingError":false}"#,
    )
    .expect("deserialize safety report");

    assert_eq!(
        de.harmful_ingredients,
        vec![HarmfulIngredient {
            name: "Retinol".into(),
            reason: "Vitamin A derivative".into()
        }]
    );
    assert!(!de.is_safe);
    assert_eq!(de.parsing_error, Some(false));
}

#[test]
fn saved_searches_blob_roundtrip_keeps_order() {
    let mut saved = SavedSearches::default();
    saved.searches.push_front(record("old"));
    saved.searches.push_front(record("new"));

    let json = serde_json::to_string(&saved).expect("serialize blob");
    assert!(json.starts_with(r#"{"searches":["#));

    let de: SavedSearches = serde_json::from_str(&json).expect("deserialize blob");
    let ids: Vec<&str> = de.searches.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["new", "old"]);
}

#[test]
fn saved_searches_blob_without_key_is_empty() {
    let de: SavedSearches = serde_json::from_str("{}").expect("deserialize empty blob");
    assert!(de.searches.is_empty());
}

#[test]
fn image_ref_placeholder_fallback() {
    assert_eq!(ImageRef::or_placeholder(None).as_str(), "/placeholder.svg");
    assert_eq!(
        ImageRef::or_placeholder(Some(&ImageRef::new("  "))).as_str(),
        "/placeholder.svg"
    );
    let data = ImageRef::new("data:image/jpeg;base64,AAAA");
    assert!(data.is_data_url());
    assert!(data.is_local());
    assert_eq!(ImageRef::or_placeholder(Some(&data)), data);
}

#[test]
fn safety_report_tolerates_loose_model_output() {
    let de: SafetyReport = serde_json::from_str(
        r#"{"harmfulIngredients":[{"name":"Retinol"},{"name":"Oxybenzone","reason":null}],"isSafe":false}"#,
    )
    .expect("decodes");
    assert!(!de.is_safe);
    assert_eq!(de.parsing_error, None);
    assert_eq!(de.harmful_ingredients.len(), 2);
    assert!(de.harmful_ingredients.iter().all(|h| h.reason.is_empty()));

    let missing: SafetyReport =
        serde_json::from_str(r#"{"harmfulIngredients":null}"#).expect("decodes");
    assert!(!missing.is_safe);
    assert_eq!(missing.parsing_error, Some(true));
    assert!(missing.harmful_ingredients.is_empty());
}
