#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use safemom::{SafeMom, SafeMomBuilder, Transport};

pub const IDENTIFY: &str = "/api/identify-product";
pub const INGREDIENTS: &str = "/api/find-ingredients";
pub const ANALYZE: &str = "/api/analyze-ingredients";

/// Environment with nothing set: server context resolves to localhost.
pub fn empty_env(_key: &str) -> Option<String> {
    None
}

/// Environment of a preview deployment.
pub fn preview_env(key: &str) -> Option<String> {
    match key {
        "SAFEMOM_DEPLOYMENT_ENV" => Some("preview".to_string()),
        "SAFEMOM_DEPLOYMENT_URL" => Some("safemom-git-feature-team.vercel.app".to_string()),
        _ => None,
    }
}

/// Route library logs to the test harness; RUST_LOG filters them.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn builder(transport: Arc<dyn Transport>) -> SafeMomBuilder {
    SafeMom::builder()
        .with_transport(transport)
        .env_lookup(empty_env)
        .timeout(Duration::from_secs(5))
        .retry_delay(Duration::from_millis(1000))
}

pub fn client(transport: Arc<dyn Transport>) -> SafeMom {
    builder(transport).build().expect("valid client")
}
