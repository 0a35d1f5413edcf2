use std::sync::Arc;
use std::time::Duration;

use safemom_core::environment::process_env;
use safemom_core::{
    AlwaysOnline, Connectivity, EnvLookup, ExecutionContext, SafeMomConfig, SafeMomError,
    Transport, UnauthorizedPolicy, is_preview_deployment, resolve_base_url,
};

/// Orchestrator that performs resilient JSON exchanges with the SafeMom backend.
pub struct SafeMom {
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) connectivity: Arc<dyn Connectivity>,
    pub(crate) cfg: SafeMomConfig,
    pub(crate) env: EnvLookup,
}

impl std::fmt::Debug for SafeMom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SafeMom")
            .field("transport", &self.transport.name())
            .field("cfg", &self.cfg)
            .finish_non_exhaustive()
    }
}

/// Builder for constructing a `SafeMom` orchestrator with custom configuration.
pub struct SafeMomBuilder {
    transport: Option<Arc<dyn Transport>>,
    connectivity: Arc<dyn Connectivity>,
    cfg: SafeMomConfig,
    env: EnvLookup,
}

impl Default for SafeMomBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SafeMomBuilder {
    /// Create a new builder with the defaults of [`SafeMomConfig`].
    ///
    /// Behavior and trade-offs:
    /// - Starts with no transport; you must provide one via [`Self::with_transport`].
    /// - Defaults: server context, 30s per-attempt timeout, 2 retries with a 1s
    ///   base delay and no jitter, lenient 401 handling, no preview bypass.
    /// - Connectivity defaults to [`AlwaysOnline`], so network failures are retried
    ///   rather than short-circuited as offline.
    #[must_use]
    pub fn new() -> Self {
        Self {
            transport: None,
            connectivity: Arc::new(AlwaysOnline),
            cfg: SafeMomConfig::default(),
            env: process_env,
        }
    }

    /// Register the transport that performs the actual exchanges.
    #[must_use]
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Replace the whole configuration at once.
    #[must_use]
    pub fn config(mut self, cfg: SafeMomConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Select the execution context used to resolve the base URL.
    ///
    /// Behavior and trade-offs:
    /// - `Browser { origin }` sends every request to that origin.
    /// - `Server` walks the deployment environment variables and falls back to
    ///   `http://localhost:3000`.
    #[must_use]
    pub fn context(mut self, context: ExecutionContext) -> Self {
        self.cfg.context = context;
        self
    }

    /// Shortcut for a browser context at `origin`.
    #[must_use]
    pub fn origin(self, origin: impl Into<String>) -> Self {
        self.context(ExecutionContext::Browser {
            origin: origin.into(),
        })
    }

    /// Set the per-attempt timeout. Requests may still override it.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.cfg.timeout = timeout;
        self
    }

    /// Set the retry budget shared by every failure category.
    ///
    /// Behavior and trade-offs:
    /// - Total attempts never exceed `retries + 1`.
    /// - Only transient failures consume the budget (5xx, HTML from 5xx, unparsable
    ///   bodies, timeouts, network errors); 4xx answers return immediately.
    #[must_use]
    pub const fn max_retries(mut self, retries: u32) -> Self {
        self.cfg.retry.max_retries = retries;
        self
    }

    /// Set the base backoff delay; retry `i` waits `delay * 2^i`.
    #[must_use]
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.cfg.retry.base_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Add up to `percent` of each backoff delay as random jitter.
    ///
    /// Behavior and trade-offs:
    /// - Spreads out retries from many clients at the cost of less predictable waits.
    /// - Validated in [`Self::build`]; must be at most 100.
    #[must_use]
    pub const fn jitter_percent(mut self, percent: u8) -> Self {
        self.cfg.retry.jitter_percent = percent;
        self
    }

    /// Choose how 401 responses are handled.
    #[must_use]
    pub const fn unauthorized_policy(mut self, policy: UnauthorizedPolicy) -> Self {
        self.cfg.unauthorized = policy;
        self
    }

    /// Send the preview-protection bypass header when a preview deployment is detected.
    #[must_use]
    pub const fn preview_bypass(mut self, enabled: bool) -> Self {
        self.cfg.preview_bypass = enabled;
        self
    }

    /// Add a header sent with every request; per-request headers still win.
    #[must_use]
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cfg.default_headers.insert(name.into(), value.into());
        self
    }

    /// Provide the online/offline signal consulted on network failures.
    #[must_use]
    pub fn connectivity(mut self, connectivity: Arc<dyn Connectivity>) -> Self {
        self.connectivity = connectivity;
        self
    }

    /// Replace the environment lookup used for base-URL resolution.
    #[must_use]
    pub fn env_lookup(mut self, env: EnvLookup) -> Self {
        self.env = env;
        self
    }

    /// Build the `SafeMom` orchestrator.
    ///
    /// # Errors
    /// Returns `InvalidArg` if no transport was registered, the timeout is zero,
    /// or the jitter percentage exceeds 100.
    pub fn build(self) -> Result<SafeMom, SafeMomError> {
        let Some(transport) = self.transport else {
            return Err(SafeMomError::InvalidArg(
                "no transport registered; add one via with_transport(...)".to_string(),
            ));
        };
        if self.cfg.timeout.is_zero() {
            return Err(SafeMomError::InvalidArg(
                "timeout must be greater than zero".to_string(),
            ));
        }
        if self.cfg.retry.jitter_percent > 100 {
            return Err(SafeMomError::InvalidArg(format!(
                "jitter_percent must be in [0, 100], got {}",
                self.cfg.retry.jitter_percent
            )));
        }

        Ok(SafeMom {
            transport,
            connectivity: self.connectivity,
            cfg: self.cfg,
            env: self.env,
        })
    }
}

impl SafeMom {
    /// Start building a new `SafeMom` instance.
    ///
    /// ```rust,ignore
    /// use std::sync::Arc;
    ///
    /// let safemom = safemom::SafeMom::builder()
    ///     .with_transport(Arc::new(ReqwestTransport::new()?))
    ///     .origin("https://safemom.app")
    ///     .max_retries(3)
    ///     .build()?;
    /// ```
    #[must_use]
    pub fn builder() -> SafeMomBuilder {
        SafeMomBuilder::new()
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &SafeMomConfig {
        &self.cfg
    }

    /// Base URL requests are currently sent to.
    #[must_use]
    pub fn base_url(&self) -> String {
        resolve_base_url(&self.cfg.context, self.env)
    }

    /// Whether requests carry the preview-protection bypass header.
    #[must_use]
    pub fn preview_bypass_active(&self) -> bool {
        self.cfg.preview_bypass && is_preview_deployment(&self.cfg.context, self.env)
    }

    /// Whether the connectivity source reports the client as online.
    #[must_use]
    pub fn is_online(&self) -> bool {
        self.connectivity.is_online()
    }

    /// Name of the registered transport.
    #[must_use]
    pub fn transport_name(&self) -> &'static str {
        self.transport.name()
    }
}
