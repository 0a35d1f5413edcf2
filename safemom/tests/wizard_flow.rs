mod helpers;

use std::sync::Arc;

use safemom::wizard::machine::{ALCOHOL_INGREDIENT, NO_INGREDIENTS_MESSAGE};
use safemom::{
    AnalysisSession, ConnectivityFlag, ImageRef, SafeMomError, SearchHistory, Step,
    StepErrorKind,
};
use safemom_mock::{MockBackend, MockBehavior, ScriptController, ScriptedTransport, fixtures};

fn session() -> AnalysisSession {
    let safemom = helpers::builder(Arc::new(MockBackend::new()))
        .max_retries(0)
        .build()
        .expect("client");
    AnalysisSession::new(Arc::new(safemom), SearchHistory::in_memory())
}

fn image(name: &str) -> ImageRef {
    ImageRef::new(format!("https://cdn.example/{name}.jpg"))
}

#[tokio::test]
async fn safe_cosmetic_walks_all_four_steps() {
    let mut s = session();
    assert_eq!(s.wizard().step(), Step::Identify);
    assert!(!s.wizard().can_identify());

    s.select_image(image("cerave"), None);
    assert!(s.wizard().can_identify());

    let w = s.identify().await.expect("identify");
    assert_eq!(w.step(), Step::FindIngredients);
    assert_eq!(w.product(), Some("CeraVe Moisturizing Cream"));

    let w = s.find_ingredients().await.expect("ingredients");
    assert_eq!(w.step(), Step::AnalyzeSafety);
    assert_eq!(w.ingredients(), ["Water", "Glycerin", "Ceramides"]);

    let w = s.analyze().await.expect("analyze");
    assert_eq!(w.step(), Step::Results);
    let safety = w.safety().expect("report");
    assert!(safety.is_safe);
    assert!(safety.harmful_ingredients.is_empty());

    let saved = s.save().expect("save");
    assert_eq!(saved.product, "CeraVe Moisturizing Cream");
    assert_eq!(saved.image_url, image("cerave"));
    assert!(saved.timestamp.ends_with('Z'));
    assert!(s.wizard().is_saved());

    let again = s.save().expect_err("already saved");
    assert!(matches!(again, SafeMomError::Disabled { .. }));
    assert_eq!(s.saved_searches().expect("list").len(), 1);
}

#[tokio::test]
async fn alcohol_skips_the_analysis_step() {
    let mut s = session();
    s.select_image(image("wine"), None);
    s.identify().await.expect("identify");
    let w = s.find_ingredients().await.expect("ingredients");

    assert_eq!(w.step(), Step::Results);
    assert!(w.alcohol_warning().is_some());
    let safety = w.safety().expect("synthesized report");
    assert!(!safety.is_safe);
    assert_eq!(safety.harmful_ingredients.len(), 1);
    assert_eq!(safety.harmful_ingredients[0].name, ALCOHOL_INGREDIENT);

    let err = s.analyze().await.expect_err("no analysis after alcohol");
    assert!(matches!(err, SafeMomError::Disabled { .. }));

    let record = s.save().expect("save");
    assert_eq!(record.harmful_ingredients[0].name, ALCOHOL_INGREDIENT);
    assert_eq!(record.is_food, Some(true));
}

#[tokio::test]
async fn vague_identification_stays_on_step_one() {
    let mut s = session();
    s.select_image(image("blurry"), None);
    let w = s.identify().await.expect("call completes");

    assert_eq!(w.step(), Step::Identify);
    assert!(w.is_unidentifiable());
    assert!(w.error().is_none());
    assert!(w.product().is_none());

    assert!(matches!(
        s.identify().await,
        Err(SafeMomError::Disabled { .. })
    ));
    assert!(matches!(
        s.find_ingredients().await,
        Err(SafeMomError::Disabled { .. })
    ));

    // A new image clears the flag.
    let w = s.select_image(image("cerave"), None);
    assert!(!w.is_unidentifiable());
    assert!(w.can_identify());
}

#[tokio::test]
async fn structured_unidentifiable_flag_is_honored() {
    let mut s = session();
    s.select_image(image("unidentifiable"), None);
    let w = s.identify().await.expect("call completes");
    assert!(w.is_unidentifiable());
    assert_eq!(w.step(), Step::Identify);
}

#[tokio::test]
async fn detected_product_jumps_to_step_two() {
    let mut s = session();
    let w = s.select_image(image("x"), Some("Red Wine".to_string()));
    assert_eq!(w.step(), Step::FindIngredients);
    assert_eq!(w.product(), Some("Red Wine"));

    let w = s.select_image(image("x"), Some("I don't know".to_string()));
    assert_eq!(w.step(), Step::Identify);
    assert!(w.is_unidentifiable());
}

#[tokio::test]
async fn unknown_product_parks_a_no_ingredients_error() {
    let mut s = session();
    s.select_image(image("x"), Some("Mystery Serum".to_string()));
    let w = s.find_ingredients().await.expect("call completes");

    assert_eq!(w.step(), Step::FindIngredients);
    let err = w.error().expect("parked error");
    assert_eq!(err.kind, StepErrorKind::NoIngredients);
    assert_eq!(err.message, NO_INGREDIENTS_MESSAGE);

    let w = s.dismiss_error();
    assert!(w.error().is_none());
    assert_eq!(w.step(), Step::FindIngredients);
}

#[tokio::test]
async fn html_error_page_is_parked_with_diagnostics() {
    let mut s = session();
    s.select_image(image("x"), Some("FAIL".to_string()));
    let w = s.find_ingredients().await.expect("call completes");

    assert_eq!(w.step(), Step::FindIngredients);
    let err = w.error().expect("parked error");
    assert_eq!(err.kind, StepErrorKind::Request);
    let diag = err.diagnostics.as_ref().expect("diagnostics");
    assert_eq!(diag.status_code, Some(500));
    assert_eq!(
        diag.error_pattern.as_ref().map(|p| p.name.as_str()),
        Some("Server Error")
    );
    assert!(w.can_find_ingredients(), "retry stays available");
}

#[tokio::test]
async fn offline_disables_backend_steps() {
    let flag = ConnectivityFlag::new(true);
    let safemom = helpers::builder(Arc::new(MockBackend::new()))
        .connectivity(Arc::new(flag.clone()))
        .build()
        .expect("client");
    let mut s = AnalysisSession::new(Arc::new(safemom), SearchHistory::in_memory());
    s.select_image(image("cerave"), None);

    flag.set_online(false);
    let err = s.identify().await.expect_err("offline");
    match err {
        SafeMomError::Disabled { action, reason } => {
            assert_eq!(action, "identify");
            assert!(reason.to_lowercase().contains("offline"), "{reason}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!s.wizard().is_online());

    flag.set_online(true);
    let w = s.identify().await.expect("back online");
    assert_eq!(w.step(), Step::FindIngredients);
}

#[tokio::test]
async fn history_keeps_the_ten_newest_saves() {
    let mut s = session();
    let mut ids = Vec::new();
    for _ in 0..11 {
        s.select_image(image("cerave"), Some("CeraVe Moisturizing Cream".to_string()));
        s.find_ingredients().await.expect("ingredients");
        s.analyze().await.expect("analyze");
        ids.push(s.save().expect("save").id);
    }

    let saved = s.saved_searches().expect("list");
    assert_eq!(saved.len(), 10);
    assert_eq!(saved[0].id, ids[10]);
    assert_eq!(saved[9].id, ids[1]);
    assert!(saved.iter().all(|r| r.id != ids[0]));
}

#[tokio::test]
async fn opening_a_saved_search_shows_read_only_results() {
    let mut s = session();
    s.select_image(image("retinol"), None);
    s.identify().await.expect("identify");
    s.find_ingredients().await.expect("ingredients");
    s.analyze().await.expect("analyze");
    let record = s.save().expect("save");
    assert!(!record.is_safe);

    s.reset();
    assert_eq!(s.wizard().step(), Step::Identify);
    assert!(s.wizard().image().is_none());

    let w = s.open_saved(&record.id).expect("open");
    assert_eq!(w.step(), Step::Results);
    assert!(w.is_from_saved());
    assert!(!w.can_save());
    assert_eq!(w.product(), Some(record.product.as_str()));
    assert_eq!(
        w.safety().map(|r| r.harmful_ingredients.clone()),
        Some(record.harmful_ingredients.clone())
    );

    assert!(matches!(
        s.open_saved("missing"),
        Err(SafeMomError::InvalidArg(_))
    ));

    assert!(s.delete_saved(&record.id).expect("delete"));
    assert!(s.saved_searches().expect("list").is_empty());
}

fn scripted_session() -> (AnalysisSession, ScriptController) {
    let (transport, controller) = ScriptedTransport::new_with_controller();
    let safemom = helpers::client(transport);
    (
        AnalysisSession::new(Arc::new(safemom), SearchHistory::in_memory()),
        controller,
    )
}

#[tokio::test]
async fn loose_analysis_output_still_reaches_results() {
    let (mut s, controller) = scripted_session();
    controller
        .respond(
            helpers::INGREDIENTS,
            fixtures::ingredients_ok(&["Squalane", "Retinol"], false, None, false),
        )
        .await;
    controller
        .respond(
            helpers::ANALYZE,
            safemom::TransportResponse::json(
                200,
                &serde_json::json!({
                    "harmfulIngredients": [{ "name": "Retinol" }],
                    "isSafe": false,
                }),
            ),
        )
        .await;

    s.select_image(image("x"), Some("The Ordinary Retinol 1% in Squalane".to_string()));
    s.find_ingredients().await.expect("ingredients");
    let w = s.analyze().await.expect("analyze");

    assert_eq!(w.step(), Step::Results);
    assert!(w.error().is_none());
    let report = w.safety().expect("report");
    assert!(!report.is_safe);
    assert_eq!(report.harmful_ingredients[0].name, "Retinol");
    assert!(report.harmful_ingredients[0].reason.is_empty());
    assert_eq!(controller.attempts(helpers::ANALYZE).await, 1);
}

#[tokio::test]
async fn analysis_without_verdict_is_flagged_as_parsing_error() {
    let (mut s, controller) = scripted_session();
    controller
        .respond(
            helpers::INGREDIENTS,
            fixtures::ingredients_ok(&["Water"], false, None, false),
        )
        .await;
    controller
        .respond(
            helpers::ANALYZE,
            safemom::TransportResponse::json(200, &serde_json::json!({ "isSafe": null })),
        )
        .await;

    s.select_image(image("x"), Some("Mystery Serum".to_string()));
    s.find_ingredients().await.expect("ingredients");
    let w = s.analyze().await.expect("analyze");

    assert_eq!(w.step(), Step::Results);
    assert!(w.parsing_error());
    let record = s.save().expect("save");
    assert_eq!(record.parsing_error, Some(true));
    assert!(!record.is_safe);
}

#[tokio::test(start_paused = true)]
async fn dropped_step_call_can_be_retried() {
    let (mut s, controller) = scripted_session();
    controller
        .push(helpers::IDENTIFY, MockBehavior::Hang)
        .await;
    controller
        .respond(helpers::IDENTIFY, fixtures::identify_ok("Red Wine"))
        .await;
    s.select_image(image("wine"), None);

    let gave_up = tokio::time::timeout(std::time::Duration::from_secs(1), s.identify()).await;
    assert!(gave_up.is_err(), "caller-side deadline fires first");
    assert!(s.wizard().in_flight().is_none());
    assert!(s.wizard().can_identify());
    assert_eq!(s.wizard().step(), Step::Identify);

    let w = s.identify().await.expect("retry");
    assert_eq!(w.step(), Step::FindIngredients);
    assert_eq!(w.product(), Some("Red Wine"));
    assert_eq!(controller.attempts(helpers::IDENTIFY).await, 2);
}
