use std::sync::Arc;

use safemom::{SafeMom, SafeMomError, Transport};

/// Environment variable that switches the demos to the offline fixture backend.
pub const USE_MOCK_VAR: &str = "SAFEMOM_DEMOS_USE_MOCK";

/// Return a transport for demos.
///
/// # Panics
/// Panics if the HTTP client cannot be constructed.
#[must_use]
pub fn get_transport() -> Arc<dyn Transport> {
    if std::env::var(USE_MOCK_VAR).is_ok() {
        println!("--- (Using mock backend for CI) ---");
        Arc::new(safemom_mock::MockBackend::new())
    } else {
        Arc::new(safemom_http::ReqwestTransport::new().expect("HTTP client construction failed"))
    }
}

/// Orchestrator over [`get_transport`] with the default configuration.
///
/// # Errors
/// Returns an error if the builder rejects the configuration.
pub fn get_client() -> Result<Arc<SafeMom>, SafeMomError> {
    Ok(Arc::new(SafeMom::builder().with_transport(get_transport()).build()?))
}

/// Image reference for a demo photo.
#[must_use]
pub fn demo_image(name: &str) -> safemom::ImageRef {
    safemom::ImageRef::new(format!("https://images.safemom.app/demo/{name}.jpg"))
}
