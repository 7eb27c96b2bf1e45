//! Fluent request builders.
//!
//! ```text
//! LabelzoomClient::convert()
//!  └─ SourceSelector ── from_pdf / from_png / … / from_zpl
//!      └─ {Pdf,Raster,Zpl}SourceBuilder ── to_zpl / to_pdf / to_png / …
//!          ├─ ZplRequest       execute / stream / labels
//!          └─ PendingRequest   execute → NotYetImplemented
//! ```
//!
//! Source validation (blank path, missing file, blank ZPL) happens in the
//! `from_*` step. Target selection consults [`crate::source::capability`]
//! and fails with `UnsupportedConversion` or `NotYetImplemented` before a
//! request object exists, so an illegal pair can never reach execution.

use crate::client::ClientInner;
use crate::convert::{PendingRequest, TargetRequest, ZplRequest};
use crate::error::Result;
use crate::input::{validate_path, validate_text};
use crate::source::{
    check_conversion, ConversionOptions, Payload, RenderMode, SourceDescriptor, SourceKind,
    TargetKind,
};
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncRead;

/// A source plus the client it will be sent through.
struct SourceState<'a> {
    client: Arc<ClientInner>,
    descriptor: SourceDescriptor<'a>,
}

impl<'a> SourceState<'a> {
    fn into_zpl(self) -> Result<ZplRequest<'a>> {
        check_conversion(self.descriptor.kind, TargetKind::Zpl)?;
        Ok(ZplRequest::new(self.client, self.descriptor))
    }

    fn into_pending(self, target: TargetKind) -> Result<PendingRequest<'a>> {
        check_conversion(self.descriptor.kind, target)?;
        Ok(PendingRequest::new(self.descriptor, target))
    }

    fn into_target(self, target: TargetKind) -> Result<TargetRequest<'a>> {
        match target {
            TargetKind::Zpl => self.into_zpl().map(TargetRequest::Zpl),
            other => self.into_pending(other).map(TargetRequest::Pending),
        }
    }
}

macro_rules! target_methods {
    ($lt:lifetime) => {
        /// Convert to ZPL.
        pub fn to_zpl(self) -> Result<ZplRequest<$lt>> {
            self.state.into_zpl()
        }

        pub fn to_pdf(self) -> Result<PendingRequest<$lt>> {
            self.state.into_pending(TargetKind::Pdf)
        }

        pub fn to_png(self) -> Result<PendingRequest<$lt>> {
            self.state.into_pending(TargetKind::Png)
        }

        pub fn to_bmp(self) -> Result<PendingRequest<$lt>> {
            self.state.into_pending(TargetKind::Bmp)
        }

        pub fn to_gif(self) -> Result<PendingRequest<$lt>> {
            self.state.into_pending(TargetKind::Gif)
        }

        pub fn to_jpeg(self) -> Result<PendingRequest<$lt>> {
            self.state.into_pending(TargetKind::Jpeg)
        }

        /// Select the target at runtime.
        pub fn to(self, target: TargetKind) -> Result<TargetRequest<$lt>> {
            self.state.into_target(target)
        }

        pub fn descriptor(&self) -> &SourceDescriptor<$lt> {
            &self.state.descriptor
        }
    };
}

// ── Entry ────────────────────────────────────────────────────────────────

/// First step of a conversion: choose the source.
pub struct SourceSelector {
    client: Arc<ClientInner>,
}

impl SourceSelector {
    pub(crate) fn new(client: Arc<ClientInner>) -> Self {
        Self { client }
    }

    fn state<'a>(&self, kind: SourceKind, payload: Payload<'a>) -> SourceState<'a> {
        SourceState {
            client: Arc::clone(&self.client),
            descriptor: SourceDescriptor::new(kind, payload),
        }
    }

    /// PDF file on disk. Fails with `InvalidArgument` for a blank path and
    /// `NotFound` when no file exists there.
    pub fn from_pdf(self, pdf_path: impl AsRef<Path>) -> Result<PdfSourceBuilder<'static>> {
        let path = validate_path("pdf_path", pdf_path.as_ref())?;
        Ok(PdfSourceBuilder {
            state: self.state(SourceKind::Pdf, Payload::File(path)),
        })
    }

    /// PDF bytes from a caller-owned reader, which is never closed.
    ///
    /// The reader is read to the end into memory when the request executes;
    /// only path sources are streamed to the service. Prefer [`Self::from_pdf`]
    /// for large documents.
    pub fn from_pdf_reader<'a, R>(self, reader: &'a mut R) -> PdfSourceBuilder<'a>
    where
        R: AsyncRead + Unpin + Send,
    {
        PdfSourceBuilder {
            state: self.state(SourceKind::Pdf, Payload::Reader(reader)),
        }
    }

    pub fn from_png(self, png_path: impl AsRef<Path>) -> Result<RasterSourceBuilder<'static>> {
        self.raster_file(SourceKind::Png, "png_path", png_path.as_ref())
    }

    /// PNG bytes from a caller-owned reader, buffered in memory at execution
    /// like [`Self::from_pdf_reader`].
    pub fn from_png_reader<'a, R>(self, reader: &'a mut R) -> RasterSourceBuilder<'a>
    where
        R: AsyncRead + Unpin + Send,
    {
        self.raster_reader(SourceKind::Png, reader)
    }

    pub fn from_bmp(self, bmp_path: impl AsRef<Path>) -> Result<RasterSourceBuilder<'static>> {
        self.raster_file(SourceKind::Bmp, "bmp_path", bmp_path.as_ref())
    }

    pub fn from_bmp_reader<'a, R>(self, reader: &'a mut R) -> RasterSourceBuilder<'a>
    where
        R: AsyncRead + Unpin + Send,
    {
        self.raster_reader(SourceKind::Bmp, reader)
    }

    pub fn from_gif(self, gif_path: impl AsRef<Path>) -> Result<RasterSourceBuilder<'static>> {
        self.raster_file(SourceKind::Gif, "gif_path", gif_path.as_ref())
    }

    pub fn from_gif_reader<'a, R>(self, reader: &'a mut R) -> RasterSourceBuilder<'a>
    where
        R: AsyncRead + Unpin + Send,
    {
        self.raster_reader(SourceKind::Gif, reader)
    }

    pub fn from_jpeg(self, jpeg_path: impl AsRef<Path>) -> Result<RasterSourceBuilder<'static>> {
        self.raster_file(SourceKind::Jpeg, "jpeg_path", jpeg_path.as_ref())
    }

    pub fn from_jpeg_reader<'a, R>(self, reader: &'a mut R) -> RasterSourceBuilder<'a>
    where
        R: AsyncRead + Unpin + Send,
    {
        self.raster_reader(SourceKind::Jpeg, reader)
    }

    /// Inline ZPL text. Fails with `InvalidArgument` when blank.
    pub fn from_zpl(self, zpl: impl Into<String>) -> Result<ZplSourceBuilder> {
        let text = validate_text("zpl_content", zpl.into())?;
        Ok(ZplSourceBuilder {
            state: self.state(SourceKind::Zpl, Payload::Text(text)),
        })
    }

    fn raster_file(
        self,
        kind: SourceKind,
        name: &'static str,
        path: &Path,
    ) -> Result<RasterSourceBuilder<'static>> {
        let path = validate_path(name, path)?;
        Ok(RasterSourceBuilder {
            state: self.state(kind, Payload::File(path)),
        })
    }

    fn raster_reader<'a, R>(self, kind: SourceKind, reader: &'a mut R) -> RasterSourceBuilder<'a>
    where
        R: AsyncRead + Unpin + Send,
    {
        RasterSourceBuilder {
            state: self.state(kind, Payload::Reader(reader)),
        }
    }
}

// ── Source builders ──────────────────────────────────────────────────────

/// PDF source. Adds option setters on top of the target selection.
pub struct PdfSourceBuilder<'a> {
    state: SourceState<'a>,
}

impl<'a> PdfSourceBuilder<'a> {
    target_methods!('a);

    pub fn fixed_width(mut self, width: u32) -> Self {
        self.state.descriptor.options.fixed_width = Some(width);
        self
    }

    pub fn fixed_height(mut self, height: u32) -> Self {
        self.state.descriptor.options.fixed_height = Some(height);
        self
    }

    /// 1-indexed page to convert.
    pub fn page_number(mut self, page: u32) -> Self {
        self.state.descriptor.options.page_number = Some(page);
        self
    }

    pub fn rendering_mode(mut self, mode: RenderMode) -> Self {
        self.state.descriptor.options.render_mode = mode;
        self
    }

    /// Replace all options at once.
    pub fn options(mut self, options: ConversionOptions) -> Self {
        self.state.descriptor.options = options;
        self
    }
}

/// PNG, BMP, GIF, or JPEG source.
pub struct RasterSourceBuilder<'a> {
    state: SourceState<'a>,
}

impl<'a> RasterSourceBuilder<'a> {
    target_methods!('a);
}

/// Inline ZPL source.
pub struct ZplSourceBuilder {
    state: SourceState<'static>,
}

impl ZplSourceBuilder {
    target_methods!('static);
}
