//! The configured client: entry point of every conversion.
//!
//! A [`LabelzoomClient`] is immutable after construction and cheap to share:
//! conversion requests hold a reference-counted handle to the same
//! configuration, so one client can serve any number of concurrent calls.
//! The only shared mutable object is the `reqwest::Client`, whose own
//! thread-safety guarantees apply.

use crate::builder::SourceSelector;
use crate::config::{ClientOptions, LabelzoomClientBuilder};
use crate::error::{LabelzoomError, Result};
use crate::transport::{Ownership, Transport};
use reqwest::header::CONTENT_TYPE;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Conversion API flavour. The service exposes buffered and streaming
/// responses under different versions; both paths are part of its contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiVersion {
    /// `/api/v2`: whole ZPL document in one response body.
    Buffered,
    /// `/api/v2.5`: one label per line, consumed incrementally.
    Streaming,
}

impl ApiVersion {
    pub fn path_prefix(self) -> &'static str {
        match self {
            ApiVersion::Buffered => "/api/v2",
            ApiVersion::Streaming => "/api/v2.5",
        }
    }
}

pub(crate) struct ClientInner {
    base_url: String,
    token: String,
    timeout: Option<Duration>,
    transport: Transport,
}

impl ClientInner {
    /// `{endpoint}/api/{version}/convert/{source_format}/to/zpl`
    pub(crate) fn convert_url(&self, api: ApiVersion, source_format: &str) -> String {
        format!(
            "{}{}/convert/{}/to/zpl",
            self.base_url,
            api.path_prefix(),
            source_format
        )
    }

    /// Start an authenticated POST with the configured timeout applied.
    pub(crate) fn post(&self, url: &str, content_type: &str) -> reqwest::RequestBuilder {
        let mut request = self
            .transport
            .http()
            .post(url)
            .bearer_auth(&self.token)
            .header(CONTENT_TYPE, content_type);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }
        request
    }
}

/// Client for the LabelZoom conversion service.
///
/// Build with [`LabelzoomClient::new`] or [`LabelzoomClient::builder`], then
/// start a conversion with [`LabelzoomClient::convert`]. Release it with
/// [`LabelzoomClient::close`] or by dropping it.
pub struct LabelzoomClient {
    inner: Arc<ClientInner>,
}

impl std::fmt::Debug for LabelzoomClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelzoomClient")
            .field("endpoint", &self.inner.base_url)
            .field("timeout", &self.inner.timeout)
            .field("transport", &self.inner.transport.ownership())
            .finish()
    }
}

impl LabelzoomClient {
    /// Client for the production endpoint with a library-owned transport.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        LabelzoomClientBuilder::new().token(token)?.build()
    }

    pub fn builder() -> LabelzoomClientBuilder {
        LabelzoomClientBuilder::new()
    }

    /// Construct directly from options, running the same validation as the
    /// builder.
    pub fn from_options(mut options: ClientOptions) -> Result<Self> {
        options.validate()?;
        let transport = options.take_transport()?;
        let token = options
            .token
            .take()
            .ok_or_else(|| LabelzoomError::ConfigurationInvalid("Token is required.".into()))?;
        let inner = ClientInner {
            base_url: options.base_url().to_string(),
            token,
            timeout: options.timeout,
            transport,
        };
        debug!("Created client for {}", inner.base_url);
        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Start a fluent conversion request.
    ///
    /// ```rust,no_run
    /// # async fn run() -> Result<(), labelzoom_sdk::LabelzoomError> {
    /// let client = labelzoom_sdk::LabelzoomClient::new("YOUR_AUTH_TOKEN")?;
    /// let zpl = client
    ///     .convert()
    ///     .from_pdf("path/to/document.pdf")?
    ///     .to_zpl()?
    ///     .execute()
    ///     .await?;
    /// println!("{zpl}");
    /// # Ok(())
    /// # }
    /// ```
    pub fn convert(&self) -> SourceSelector {
        SourceSelector::new(Arc::clone(&self.inner))
    }

    /// Base URL requests are sent to (trailing `/` removed).
    pub fn endpoint(&self) -> &str {
        &self.inner.base_url
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.inner.timeout
    }

    /// `true` when releasing this client also closes its HTTP transport.
    pub fn owns_transport(&self) -> bool {
        self.inner.transport.ownership() == Ownership::Owned
    }

    /// Release the client now.
    ///
    /// An owned transport is closed as soon as no request built from this
    /// client is still alive; a caller-supplied transport stays open unless
    /// disposal was opted into.
    pub fn close(self) {
        debug!(
            "Closing client for {} ({} outstanding request handles)",
            self.inner.base_url,
            Arc::strong_count(&self.inner) - 1
        );
        drop(self);
    }

    // ── One-shot helpers ─────────────────────────────────────────────────

    /// Convert a PDF file to a single ZPL string.
    ///
    /// Best for smaller documents; equivalent to
    /// `convert().from_pdf(path)?.to_zpl()?.execute()`.
    pub async fn pdf_to_zpl(&self, pdf_path: impl AsRef<Path>) -> Result<String> {
        self.convert().from_pdf(pdf_path)?.to_zpl()?.execute().await
    }

    /// Convert a PDF file and receive the labels one at a time.
    ///
    /// Best for larger documents; equivalent to
    /// `convert().from_pdf(path)?.to_zpl()?.stream(on_label)`.
    pub async fn pdf_to_zpl_stream<F, Fut>(
        &self,
        pdf_path: impl AsRef<Path>,
        on_label: F,
    ) -> Result<()>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        self.convert()
            .from_pdf(pdf_path)?
            .to_zpl()?
            .stream(on_label)
            .await
    }
}
