//! Error types for the labelzoom-sdk library.
//!
//! Every failure surfaces to the immediate caller as a [`LabelzoomError`].
//! Nothing is retried, logged as a warning, or swallowed inside the library;
//! retry policy belongs to the caller or to the transport they supply.
//!
//! The variants fall into three groups:
//!
//! * **Construction**: detected synchronously while building a client or a
//!   conversion request, before any network I/O ([`LabelzoomError::InvalidArgument`],
//!   [`LabelzoomError::NotFound`], [`LabelzoomError::UnsupportedConversion`],
//!   [`LabelzoomError::NotYetImplemented`], [`LabelzoomError::ConfigurationInvalid`]).
//! * **Execution**: the request was dispatched (or was about to be) and
//!   something went wrong on the way ([`LabelzoomError::RequestFailed`],
//!   [`LabelzoomError::Transport`], [`LabelzoomError::Io`],
//!   [`LabelzoomError::UnsupportedContentType`]).
//! * **Cancellation**: the caller's token fired at a checkpoint
//!   ([`LabelzoomError::Cancelled`]).

use crate::source::{SourceKind, TargetKind};
use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T, E = LabelzoomError> = std::result::Result<T, E>;

/// All errors returned by the labelzoom-sdk library.
#[derive(Debug, Error)]
pub enum LabelzoomError {
    // ── Construction errors ───────────────────────────────────────────────
    /// A caller-supplied argument was blank, zero, or otherwise malformed.
    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    /// A source file did not exist when the request was built or executed.
    #[error("Source file not found: '{path}'\nCheck the path exists and is readable.")]
    NotFound { path: PathBuf },

    /// The (source, target) pair is outside the capability matrix and will
    /// never be accepted.
    #[error("{from} to {to} conversion is not supported")]
    UnsupportedConversion { from: SourceKind, to: TargetKind },

    /// The (source, target) pair is reserved for future support but is not
    /// wired to the service yet.
    #[error("{from} to {to} conversion is not yet supported by the API")]
    NotYetImplemented { from: SourceKind, to: TargetKind },

    /// Client configuration failed validation in `build()`.
    #[error("Invalid configuration: {0}")]
    ConfigurationInvalid(String),

    // ── Execution errors ──────────────────────────────────────────────────
    /// The service answered with a non-success status.
    #[error("API request failed with status code {status}: {body}")]
    RequestFailed { status: u16, body: String },

    /// The stored content type has no source-format path segment.
    ///
    /// Builders only produce known content types, so reaching this means the
    /// source kind is declared but not wired end-to-end (BMP, GIF, JPEG).
    #[error("Unsupported content type '{content_type}': no source format mapping")]
    UnsupportedContentType { content_type: String },

    /// Connection, timeout, or body-read failure inside the HTTP client.
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A source file existed at build time but could not be opened or read.
    #[error("Failed to read source file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A label handler passed to a streaming call returned an error.
    /// Streaming stops at that label; labels handled before it are kept.
    #[error("Label handler failed: {0}")]
    Callback(#[source] Box<dyn std::error::Error + Send + Sync>),

    // ── Cancellation ──────────────────────────────────────────────────────
    /// The caller's cancellation token fired at a checkpoint.
    #[error("Operation was cancelled")]
    Cancelled,
}

impl LabelzoomError {
    pub(crate) fn invalid_argument(name: &'static str, reason: impl Into<String>) -> Self {
        LabelzoomError::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }

    /// Wrap a failure raised inside a streaming label handler.
    pub fn callback(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        LabelzoomError::Callback(err.into())
    }

    /// `true` when the operation stopped because its token was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, LabelzoomError::Cancelled)
    }

    /// The HTTP status of a [`LabelzoomError::RequestFailed`], if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            LabelzoomError::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}
