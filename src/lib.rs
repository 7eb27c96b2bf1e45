//! # labelzoom-sdk
//!
//! Client library for the LabelZoom conversion service: turn PDF documents
//! and raster images into ZPL printer labels.
//!
//! The library does not look inside PDFs, images, or ZPL. Payloads are opaque
//! byte streams handed to the service over HTTP; this crate's job is to build
//! only legal requests and to deliver the response, either whole or one label
//! at a time.
//!
//! ## Request Flow
//!
//! ```text
//! LabelzoomClient
//!  │
//!  ├─ 1. convert()        SourceSelector
//!  ├─ 2. from_pdf(…)      validate source (blank path, missing file)
//!  ├─ 3. to_zpl()         capability matrix → ZplRequest or typed error
//!  └─ 4. execute()        POST /api/v2/convert/{fmt}/to/zpl   → String
//!        stream(cb)       POST /api/v2.5/convert/{fmt}/to/zpl → label per line
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use labelzoom_sdk::LabelzoomClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = LabelzoomClient::new("YOUR_AUTH_TOKEN")?;
//!
//!     // Whole document at once
//!     let zpl = client
//!         .convert()
//!         .from_pdf("shipping_labels.pdf")?
//!         .to_zpl()?
//!         .execute()
//!         .await?;
//!     println!("{zpl}");
//!
//!     // One label at a time
//!     let mut count = 0;
//!     client
//!         .convert()
//!         .from_pdf("shipping_labels.pdf")?
//!         .page_number(1)
//!         .to_zpl()?
//!         .stream(|label| {
//!             count += 1;
//!             println!("label {count}: {} bytes", label.len());
//!             async { Ok(()) }
//!         })
//!         .await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Supported Conversions
//!
//! | Source | ZPL | PDF | PNG | BMP/GIF/JPEG |
//! |--------|-----|-----|-----|--------------|
//! | PDF    | ✔   | not yet | – | – |
//! | PNG/BMP/GIF/JPEG | ✔ | – | – | – |
//! | ZPL    | –   | not yet | not yet | – |
//!
//! "not yet" pairs fail with [`LabelzoomError::NotYetImplemented`]; "–" pairs
//! fail with [`LabelzoomError::UnsupportedConversion`]. BMP, GIF, and JPEG
//! sources build a ZPL request but the service has no route for them yet, so
//! execution fails with [`LabelzoomError::UnsupportedContentType`].

// ── Modules ──────────────────────────────────────────────────────────────

pub mod builder;
pub mod client;
pub mod config;
pub mod convert;
pub mod error;
mod input;
pub mod source;
pub mod stream;
mod transport;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use builder::{PdfSourceBuilder, RasterSourceBuilder, SourceSelector, ZplSourceBuilder};
pub use client::{ApiVersion, LabelzoomClient};
pub use config::{ClientOptions, LabelzoomClientBuilder, DEFAULT_ENDPOINT};
pub use convert::{PendingRequest, TargetRequest, ZplRequest};
pub use error::{LabelzoomError, Result};
pub use source::{
    capability, Capability, ConversionOptions, RenderMode, SourceDescriptor, SourceKind,
    TargetKind,
};
pub use stream::{demux, LabelDecoder, LabelStream};
pub use tokio_util::sync::CancellationToken;
pub use transport::Ownership;
