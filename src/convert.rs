//! Executable conversion requests and buffered execution.
//!
//! [`ZplRequest`] is the only request that talks to the service. It offers two
//! execution modes over the same POST:
//!
//! * buffered ([`ZplRequest::execute`]), implemented here: the whole ZPL
//!   document is returned as one string;
//! * streaming ([`ZplRequest::stream`], [`ZplRequest::labels`]), implemented in
//!   [`crate::stream`]: labels are delivered one by one as they arrive.
//!
//! Every call performs a fresh round trip; nothing is cached between calls.

use crate::client::{ApiVersion, ClientInner};
use crate::error::{LabelzoomError, Result};
use crate::input;
use crate::source::{source_format, SourceDescriptor, SourceKind, TargetKind};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// A request whose target was chosen at runtime via `to(TargetKind)`.
#[derive(Debug)]
pub enum TargetRequest<'a> {
    Zpl(ZplRequest<'a>),
    Pending(PendingRequest<'a>),
}

impl<'a> TargetRequest<'a> {
    pub fn target(&self) -> TargetKind {
        match self {
            TargetRequest::Zpl(_) => TargetKind::Zpl,
            TargetRequest::Pending(p) => p.target(),
        }
    }

    /// The ZPL request, if that is what was built.
    pub fn into_zpl(self) -> Option<ZplRequest<'a>> {
        match self {
            TargetRequest::Zpl(request) => Some(request),
            TargetRequest::Pending(_) => None,
        }
    }
}

// ── ZPL ──────────────────────────────────────────────────────────────────

/// An executable conversion to ZPL.
pub struct ZplRequest<'a> {
    client: Arc<ClientInner>,
    source: SourceDescriptor<'a>,
    content_type: &'static str,
}

impl std::fmt::Debug for ZplRequest<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZplRequest")
            .field("source", &self.source)
            .field("content_type", &self.content_type)
            .finish()
    }
}

impl<'a> ZplRequest<'a> {
    pub(crate) fn new(client: Arc<ClientInner>, source: SourceDescriptor<'a>) -> Self {
        let content_type = source.kind.media_type();
        Self {
            client,
            source,
            content_type,
        }
    }

    pub fn source(&self) -> &SourceDescriptor<'a> {
        &self.source
    }

    pub fn source_kind(&self) -> SourceKind {
        self.source.kind
    }

    /// `Content-Type` sent with the payload.
    pub fn content_type(&self) -> &'static str {
        self.content_type
    }

    /// Full URL this request posts to for the given API flavour.
    pub fn url(&self, api: ApiVersion) -> Result<String> {
        Ok(self
            .client
            .convert_url(api, source_format(self.content_type)?))
    }

    /// Convert and return the whole ZPL document.
    pub async fn execute(&mut self) -> Result<String> {
        self.execute_with_cancel(&CancellationToken::new()).await
    }

    /// Like [`Self::execute`], observing `cancel` once the response headers
    /// have arrived and before the body is read.
    pub async fn execute_with_cancel(&mut self, cancel: &CancellationToken) -> Result<String> {
        let response = self.send(ApiVersion::Buffered).await?;
        if cancel.is_cancelled() {
            debug!("Buffered conversion cancelled after response headers");
            return Err(LabelzoomError::Cancelled);
        }
        let zpl = response.text().await?;
        info!("Received {} bytes of ZPL", zpl.len());
        Ok(zpl)
    }

    /// Resolve the payload, POST it, and check the status.
    ///
    /// A file payload is owned by the request body, so it is closed on every
    /// path out of this function, including when the caller drops the future.
    pub(crate) async fn send(&mut self, api: ApiVersion) -> Result<reqwest::Response> {
        let format = source_format(self.content_type)?;
        self.source.options.validate()?;
        let url = self.client.convert_url(api, format);

        let body = input::open_body(&mut self.source.payload).await?;
        let mut request = self.client.post(&url, self.content_type).body(body);
        if self.source.kind == SourceKind::Pdf && !self.source.options.is_default() {
            request = request.query(&self.source.options);
        }

        info!("POST {} ({})", url, self.content_type);
        let response = request.send().await?;
        let status = response.status();
        debug!("Response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LabelzoomError::RequestFailed {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

// ── Not-yet-implemented targets ──────────────────────────────────────────

/// A request for a target the service does not produce yet (PDF, PNG, BMP,
/// GIF, JPEG). Execution always fails with `NotYetImplemented`.
#[derive(Debug)]
pub struct PendingRequest<'a> {
    source: SourceDescriptor<'a>,
    target: TargetKind,
}

impl<'a> PendingRequest<'a> {
    pub(crate) fn new(source: SourceDescriptor<'a>, target: TargetKind) -> Self {
        Self { source, target }
    }

    pub fn source(&self) -> &SourceDescriptor<'a> {
        &self.source
    }

    pub fn target(&self) -> TargetKind {
        self.target
    }

    pub async fn execute(&mut self) -> Result<Vec<u8>> {
        Err(LabelzoomError::NotYetImplemented {
            from: self.source.kind,
            to: self.target,
        })
    }
}
