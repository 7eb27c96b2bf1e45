//! Client configuration and its validating builder.
//!
//! [`ClientOptions`] carries everything a [`crate::LabelzoomClient`] needs:
//! endpoint, bearer token, optional timeout, and the transport with its
//! ownership flag. It is assembled through [`LabelzoomClientBuilder`], whose
//! setters reject bad arguments immediately (`InvalidArgument`) while
//! `build()` checks the cross-field requirements (`ConfigurationInvalid`).
//!
//! # Example
//! ```rust,no_run
//! use labelzoom_sdk::LabelzoomClient;
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), labelzoom_sdk::LabelzoomError> {
//! let client = LabelzoomClient::builder()
//!     .token("YOUR_AUTH_TOKEN")?
//!     .endpoint("https://api.labelzoom.net")?
//!     .timeout(Duration::from_secs(30))?
//!     .build()?;
//! # Ok(())
//! # }
//! ```

use crate::client::LabelzoomClient;
use crate::error::{LabelzoomError, Result};
use crate::transport::Transport;
use std::fmt;
use std::time::Duration;

/// Production endpoint of the conversion service.
pub const DEFAULT_ENDPOINT: &str = "https://api.labelzoom.net";

/// Environment variable read by [`LabelzoomClientBuilder::from_env`] for the token.
pub const TOKEN_ENV: &str = "LABELZOOM_API_TOKEN";

/// Environment variable read by [`LabelzoomClientBuilder::from_env`] for the endpoint.
pub const ENDPOINT_ENV: &str = "LABELZOOM_ENDPOINT";

const DEFAULT_USER_AGENT: &str = concat!("labelzoom-sdk/", env!("CARGO_PKG_VERSION"));

/// Connection parameters for the conversion service.
#[derive(Clone)]
pub struct ClientOptions {
    /// Bearer token sent as `Authorization: Bearer <token>`. Required.
    pub token: Option<String>,

    /// Base URL of the service. Default: [`DEFAULT_ENDPOINT`].
    pub endpoint: String,

    /// Per-request timeout. `None` leaves it to the transport.
    pub timeout: Option<Duration>,

    /// User agent for a library-built transport.
    pub user_agent: String,

    /// Caller-supplied transport. `None` means the library builds its own.
    pub http_client: Option<reqwest::Client>,

    /// Close the caller-supplied transport when the client is released.
    /// Ignored for library-built transports, which are always closed.
    pub dispose_http_client: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            token: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            http_client: None,
            dispose_http_client: true,
        }
    }
}

impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field(
                "http_client",
                &self.http_client.as_ref().map(|_| "<reqwest::Client>"),
            )
            .field("dispose_http_client", &self.dispose_http_client)
            .finish()
    }
}

impl ClientOptions {
    /// Options with the given token and every other field at its default.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..Self::default()
        }
    }

    /// Check required values; called by [`LabelzoomClientBuilder::build`].
    pub fn validate(&self) -> Result<()> {
        match self.token.as_deref() {
            None => {
                return Err(LabelzoomError::ConfigurationInvalid(
                    "Token is required. Use token() to set the authentication token.".into(),
                ))
            }
            Some(t) if t.trim().is_empty() => {
                return Err(LabelzoomError::ConfigurationInvalid(
                    "Token cannot be empty.".into(),
                ))
            }
            Some(_) => {}
        }
        if self.endpoint.trim().is_empty() {
            return Err(LabelzoomError::ConfigurationInvalid(
                "Endpoint cannot be empty.".into(),
            ));
        }
        if self.timeout == Some(Duration::ZERO) {
            return Err(LabelzoomError::ConfigurationInvalid(
                "Timeout must be greater than zero.".into(),
            ));
        }
        Ok(())
    }

    /// Endpoint with any trailing `/` removed.
    pub(crate) fn base_url(&self) -> &str {
        self.endpoint.trim_end_matches('/')
    }

    pub(crate) fn take_transport(&mut self) -> Result<Transport> {
        match self.http_client.take() {
            Some(client) => Ok(Transport::supplied(client, self.dispose_http_client)),
            None => Transport::owned(&self.user_agent),
        }
    }
}

/// Builder for [`LabelzoomClient`].
#[derive(Debug, Default)]
pub struct LabelzoomClientBuilder {
    options: ClientOptions,
}

impl LabelzoomClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed token and endpoint from [`TOKEN_ENV`] and [`ENDPOINT_ENV`].
    ///
    /// Unset variables are skipped; a token can still be set afterwards.
    pub fn from_env() -> Result<Self> {
        let mut builder = Self::new();
        if let Ok(token) = std::env::var(TOKEN_ENV) {
            builder = builder.token(token)?;
        }
        if let Ok(endpoint) = std::env::var(ENDPOINT_ENV) {
            builder = builder.endpoint(endpoint)?;
        }
        Ok(builder)
    }

    pub fn token(mut self, token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(LabelzoomError::invalid_argument(
                "token",
                "Token cannot be null or empty.",
            ));
        }
        self.options.token = Some(token);
        Ok(self)
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Result<Self> {
        let endpoint = endpoint.into();
        if endpoint.trim().is_empty() {
            return Err(LabelzoomError::invalid_argument(
                "endpoint",
                "Endpoint cannot be null or empty.",
            ));
        }
        match reqwest::Url::parse(&endpoint) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => {
                return Err(LabelzoomError::invalid_argument(
                    "endpoint",
                    format!("unsupported scheme '{}'", url.scheme()),
                ))
            }
            Err(e) => return Err(LabelzoomError::invalid_argument("endpoint", e.to_string())),
        }
        self.options.endpoint = endpoint;
        Ok(self)
    }

    pub fn timeout(mut self, timeout: Duration) -> Result<Self> {
        if timeout.is_zero() {
            return Err(LabelzoomError::invalid_argument(
                "timeout",
                "Timeout must be greater than zero.",
            ));
        }
        self.options.timeout = Some(timeout);
        Ok(self)
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Result<Self> {
        let user_agent = user_agent.into();
        if user_agent.trim().is_empty() {
            return Err(LabelzoomError::invalid_argument(
                "user_agent",
                "User agent cannot be empty.",
            ));
        }
        self.options.user_agent = user_agent;
        Ok(self)
    }

    /// Use a caller-supplied HTTP client.
    ///
    /// The caller keeps ownership: the client stays open after the
    /// [`LabelzoomClient`] is released unless [`Self::dispose_http_client`]
    /// is set to `true` afterwards.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.options.http_client = Some(client);
        self.options.dispose_http_client = false;
        self
    }

    /// Whether releasing the client also closes a caller-supplied transport.
    pub fn dispose_http_client(mut self, dispose: bool) -> Self {
        self.options.dispose_http_client = dispose;
        self
    }

    /// Snapshot of the options assembled so far.
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Validate and build the client.
    pub fn build(self) -> Result<LabelzoomClient> {
        self.options.validate()?;
        LabelzoomClient::from_options(self.options)
    }
}
