//! Client construction.

use std::time::Duration;

use thiserror::Error;

/// Base URL used when the configuration does not override it.
pub const DEFAULT_BASE_URL: &str = "https://api.infomaniak.com";

/// Absolute timeout applied to every request by the underlying HTTP client.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for [`InfomaniakClient::new`].
#[derive(Clone, Default)]
pub struct ClientConfig {
    /// API token sent as `Authorization: Bearer <token>`. Required.
    pub token: String,
    /// Overrides [`DEFAULT_BASE_URL`]. Used verbatim: request paths are
    /// appended to it without normalisation.
    pub base_url: Option<String>,
    /// Overrides [`DEFAULT_TIMEOUT`].
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    /// Configuration with the given token and all defaults.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            ..Self::default()
        }
    }

    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// The client could not be constructed.
#[derive(Debug, Error)]
pub enum ClientBuildError {
    /// The configuration carried an empty token.
    #[error("an API token is required")]
    MissingToken,

    /// The HTTP client could not be initialised (e.g. no TLS backend).
    #[error("initialise HTTP client")]
    Http(#[source] reqwest::Error),
}

/// Typed client for the Infomaniak domain API.
///
/// Immutable after construction and cheap to clone; clones share one
/// connection pool. Safe to use from several tasks at once.
#[derive(Clone)]
pub struct InfomaniakClient {
    pub(crate) http: reqwest::Client,
    pub(crate) base_url: String,
    pub(crate) token: String,
    timeout: Duration,
}

impl InfomaniakClient {
    /// Builds a client.
    ///
    /// # Errors
    ///
    /// Returns [`ClientBuildError::MissingToken`] for an empty token and
    /// [`ClientBuildError::Http`] when the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, ClientBuildError> {
        if config.token.is_empty() {
            return Err(ClientBuildError::MissingToken);
        }

        let timeout = config.timeout.unwrap_or(DEFAULT_TIMEOUT);
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("informaniak/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientBuildError::Http)?;

        Ok(Self {
            http,
            base_url: config
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()),
            token: config.token,
            timeout,
        })
    }

    /// The base URL every request path is appended to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The absolute per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl std::fmt::Debug for InfomaniakClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InfomaniakClient")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}
