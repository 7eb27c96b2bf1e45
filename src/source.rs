//! Source and target descriptors, plus the capability matrix that decides
//! which conversions may be built.
//!
//! The legality of every (source, target) pair lives in one place,
//! [`capability`]. Source builders never decide on their own whether a
//! conversion exists; they ask the table and map the answer to either a
//! request object or a typed error.

use crate::error::{LabelzoomError, Result};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use tokio::io::AsyncRead;

// ── Kinds ────────────────────────────────────────────────────────────────

/// Input document/image format supplied for conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Pdf,
    Png,
    Bmp,
    Gif,
    Jpeg,
    Zpl,
}

impl SourceKind {
    /// MIME type sent as the request `Content-Type` for this source.
    pub fn media_type(self) -> &'static str {
        match self {
            SourceKind::Pdf => "application/pdf",
            SourceKind::Png => "image/png",
            SourceKind::Bmp => "image/bmp",
            SourceKind::Gif => "image/gif",
            SourceKind::Jpeg => "image/jpeg",
            SourceKind::Zpl => "text/plain",
        }
    }

    /// `true` for the raster image kinds.
    pub fn is_raster(self) -> bool {
        matches!(
            self,
            SourceKind::Png | SourceKind::Bmp | SourceKind::Gif | SourceKind::Jpeg
        )
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SourceKind::Pdf => "PDF",
            SourceKind::Png => "PNG",
            SourceKind::Bmp => "BMP",
            SourceKind::Gif => "GIF",
            SourceKind::Jpeg => "JPEG",
            SourceKind::Zpl => "ZPL",
        })
    }
}

/// Desired output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    Zpl,
    Pdf,
    Png,
    Bmp,
    Gif,
    Jpeg,
}

impl TargetKind {
    pub const ALL: [TargetKind; 6] = [
        TargetKind::Zpl,
        TargetKind::Pdf,
        TargetKind::Png,
        TargetKind::Bmp,
        TargetKind::Gif,
        TargetKind::Jpeg,
    ];
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TargetKind::Zpl => "ZPL",
            TargetKind::Pdf => "PDF",
            TargetKind::Png => "PNG",
            TargetKind::Bmp => "BMP",
            TargetKind::Gif => "GIF",
            TargetKind::Jpeg => "JPEG",
        })
    }
}

// ── Capability matrix ────────────────────────────────────────────────────

/// Whether a (source, target) pair can be built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Wired end-to-end to the conversion service.
    Supported,
    /// Reserved for future support; building fails with
    /// [`LabelzoomError::NotYetImplemented`].
    NotYetImplemented,
    /// Outside the matrix; building fails with
    /// [`LabelzoomError::UnsupportedConversion`].
    Unsupported,
}

/// Look up the capability of converting `source` into `target`.
///
/// | source \ target | ZPL | PDF | PNG | BMP/GIF/JPEG |
/// |---|---|---|---|---|
/// | PDF | supported | not yet | unsupported | unsupported |
/// | raster | supported | unsupported | unsupported | unsupported |
/// | ZPL | unsupported | not yet | not yet | unsupported |
pub const fn capability(source: SourceKind, target: TargetKind) -> Capability {
    use Capability::*;
    match (source, target) {
        (SourceKind::Pdf, TargetKind::Zpl) => Supported,
        (SourceKind::Pdf, TargetKind::Pdf) => NotYetImplemented,
        (SourceKind::Png | SourceKind::Bmp | SourceKind::Gif | SourceKind::Jpeg, TargetKind::Zpl) => {
            Supported
        }
        (SourceKind::Zpl, TargetKind::Pdf | TargetKind::Png) => NotYetImplemented,
        _ => Unsupported,
    }
}

/// Resolve a pair through [`capability`], turning the non-supported answers
/// into their typed errors.
pub(crate) fn check_conversion(source: SourceKind, target: TargetKind) -> Result<()> {
    match capability(source, target) {
        Capability::Supported => Ok(()),
        Capability::NotYetImplemented => Err(LabelzoomError::NotYetImplemented {
            from: source,
            to: target,
        }),
        Capability::Unsupported => Err(LabelzoomError::UnsupportedConversion {
            from: source,
            to: target,
        }),
    }
}

/// Map a stored content type to the `{sourceFormat}` URL path segment.
///
/// Only PDF and PNG are wired end-to-end; other raster kinds build fine but
/// fail here at execution time.
pub fn source_format(content_type: &str) -> Result<&'static str> {
    match content_type {
        "application/pdf" => Ok("pdf"),
        "image/png" => Ok("png"),
        other => Err(LabelzoomError::UnsupportedContentType {
            content_type: other.to_string(),
        }),
    }
}

// ── Options ──────────────────────────────────────────────────────────────

/// How the service rasterises PDF content before encoding it as ZPL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Rasterise each page to an image (default).
    #[default]
    Image,
    /// Keep vector drawing commands where the service can.
    Vector,
}

impl RenderMode {
    fn is_default(&self) -> bool {
        *self == RenderMode::Image
    }
}

/// Per-source conversion options. Unset fields mean "service default".
///
/// Serialised as the request query string; only set (or non-default) fields
/// are sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionOptions {
    /// 1-indexed page to convert.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,
    /// Fixed label width in dots.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_width: Option<u32>,
    /// Fixed label height in dots.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_height: Option<u32>,
    #[serde(skip_serializing_if = "RenderMode::is_default")]
    pub render_mode: RenderMode,
}

impl ConversionOptions {
    /// `true` when nothing differs from the service defaults.
    pub fn is_default(&self) -> bool {
        *self == ConversionOptions::default()
    }

    /// Check the options right before a request is dispatched.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("page_number", self.page_number),
            ("fixed_width", self.fixed_width),
            ("fixed_height", self.fixed_height),
        ] {
            if value == Some(0) {
                return Err(LabelzoomError::invalid_argument(name, "must be greater than zero"));
            }
        }
        Ok(())
    }
}

// ── Descriptor ───────────────────────────────────────────────────────────

/// Where the bytes of a conversion input come from.
///
/// Exactly one reference is held. A `File` is opened lazily at execution time
/// and closed when the request body is dropped; a `Reader` is borrowed from the
/// caller and never closed.
pub(crate) enum Payload<'a> {
    File(PathBuf),
    Reader(&'a mut (dyn AsyncRead + Unpin + Send)),
    Text(String),
}

impl fmt::Debug for Payload<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::File(path) => f.debug_tuple("File").field(path).finish(),
            Payload::Reader(_) => f.write_str("Reader(<dyn AsyncRead>)"),
            Payload::Text(text) => f.debug_tuple("Text").field(&text.len()).finish(),
        }
    }
}

/// A validated conversion input: kind, payload, and options.
#[derive(Debug)]
pub struct SourceDescriptor<'a> {
    pub(crate) kind: SourceKind,
    pub(crate) payload: Payload<'a>,
    pub(crate) options: ConversionOptions,
}

impl<'a> SourceDescriptor<'a> {
    pub(crate) fn new(kind: SourceKind, payload: Payload<'a>) -> Self {
        Self {
            kind,
            payload,
            options: ConversionOptions::default(),
        }
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    pub fn options(&self) -> &ConversionOptions {
        &self.options
    }

    /// The file path for path-backed sources.
    pub fn path(&self) -> Option<&std::path::Path> {
        match &self.payload {
            Payload::File(path) => Some(path),
            _ => None,
        }
    }
}
