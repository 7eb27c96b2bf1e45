//! Input resolution: validate caller-supplied sources at build time and turn
//! them into a request body at execution time.
//!
//! File I/O happens in exactly one place, [`open_body`]. A path is only
//! checked for existence while the request is being built; the file itself is
//! opened when the request executes and is owned by the request body, so it
//! is closed whenever the body is dropped (after the upload, on error, or when
//! the caller cancels). Borrowed readers are drained into memory and handed
//! back untouched.

use crate::error::{LabelzoomError, Result};
use crate::source::Payload;
use reqwest::Body;
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;
use tokio_util::io::ReaderStream;
use tracing::debug;

/// Validate a source path: non-blank, and naming an existing regular file.
///
/// The blank check runs before any file-system access.
pub(crate) fn validate_path(name: &'static str, path: &Path) -> Result<PathBuf> {
    if path.as_os_str().to_string_lossy().trim().is_empty() {
        return Err(LabelzoomError::invalid_argument(name, "path cannot be empty"));
    }

    let path = path.to_path_buf();
    if !path.is_file() {
        return Err(LabelzoomError::NotFound { path });
    }

    debug!("Resolved source file: {}", path.display());
    Ok(path)
}

/// Validate inline text content (ZPL source).
pub(crate) fn validate_text(name: &'static str, text: String) -> Result<String> {
    if text.trim().is_empty() {
        return Err(LabelzoomError::invalid_argument(name, "content cannot be empty"));
    }
    Ok(text)
}

/// Produce the request body for a payload.
pub(crate) async fn open_body(payload: &mut Payload<'_>) -> Result<Body> {
    match payload {
        Payload::File(path) => {
            let file = tokio::fs::File::open(&*path).await.map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    LabelzoomError::NotFound { path: path.clone() }
                } else {
                    LabelzoomError::Io {
                        path: path.clone(),
                        source: e,
                    }
                }
            })?;
            debug!("Streaming upload from {}", path.display());
            Ok(Body::wrap_stream(ReaderStream::new(file)))
        }
        Payload::Reader(reader) => {
            let mut buf = Vec::new();
            reader
                .read_to_end(&mut buf)
                .await
                .map_err(|e| LabelzoomError::Io {
                    path: PathBuf::from("<reader>"),
                    source: e,
                })?;
            debug!("Read {} bytes from caller-supplied reader", buf.len());
            Ok(Body::from(buf))
        }
        Payload::Text(text) => Ok(Body::from(text.clone())),
    }
}
