use std::time::Duration;

use crate::{HttpTransportError, ReqwestTransport};

/// Default `User-Agent` sent by [`ReqwestTransport`].
pub const DEFAULT_USER_AGENT: &str = concat!("safemom-http/", env!("CARGO_PKG_VERSION"));

/// Redirects followed before giving up.
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Builder for [`ReqwestTransport`].
///
/// The transport keeps a cookie jar and follows redirects by default, so an
/// auth wall shows up to the orchestrator as a redirected HTML page.
#[derive(Debug, Clone)]
pub struct ReqwestTransportBuilder {
    user_agent: String,
    max_redirects: usize,
    cookies: bool,
    timeout: Option<Duration>,
}

impl Default for ReqwestTransportBuilder {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_redirects: DEFAULT_MAX_REDIRECTS,
            cookies: true,
            timeout: None,
        }
    }
}

impl ReqwestTransportBuilder {
    /// Override the `User-Agent` header.
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = ua.into();
        self
    }

    /// Maximum redirects to follow; `0` disables following.
    #[must_use]
    pub const fn max_redirects(mut self, n: usize) -> Self {
        self.max_redirects = n;
        self
    }

    /// Keep cookies between requests (on by default).
    #[must_use]
    pub const fn cookies(mut self, enabled: bool) -> Self {
        self.cookies = enabled;
        self
    }

    /// Client-level deadline. The orchestrator applies its own per-attempt
    /// timeout, so this is only a backstop.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the transport.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be constructed
    /// (for example when the TLS backend fails to initialize).
    pub fn build(self) -> Result<ReqwestTransport, HttpTransportError> {
        let redirect = if self.max_redirects == 0 {
            reqwest::redirect::Policy::none()
        } else {
            reqwest::redirect::Policy::limited(self.max_redirects)
        };
        let mut builder = reqwest::Client::builder()
            .user_agent(self.user_agent)
            .redirect(redirect)
            .cookie_store(self.cookies);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(ReqwestTransport::from_client(builder.build()?))
    }
}
