//! Streaming conversion API: one ZPL label per response line.
//!
//! The streaming endpoint writes each label on its own line as soon as it is
//! rendered. This module splits that body back into labels:
//!
//! ```text
//! response bytes ──▶ LabelDecoder ──▶ LabelStream ──▶ on_label(label)
//!   (chunks)         (ASCII lines)    (pull-based)     (one at a time)
//! ```
//!
//! Labels are delivered strictly in arrival order. With the callback API the
//! handler for label N completes before label N+1 is read; nothing is fanned
//! out concurrently. Cancellation is checked before every label, and labels
//! already delivered are never replayed. A handler that returns an error
//! stops the stream and the error is returned to the caller.

use crate::client::ApiVersion;
use crate::convert::ZplRequest;
use crate::error::{LabelzoomError, Result};
use futures::stream::{self, StreamExt};
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use tokio_stream::Stream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// A boxed stream of labels.
pub type LabelStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

// ── Decoder ──────────────────────────────────────────────────────────────

/// Incremental line splitter for the streaming response body.
///
/// `\n`, `\r\n` and a lone `\r` all end a line, even when split across
/// chunks. Bytes are decoded as ASCII without BOM detection; anything outside
/// ASCII becomes `?`. Empty lines are dropped.
#[derive(Debug, Default)]
pub struct LabelDecoder {
    line: Vec<u8>,
    after_cr: bool,
    ready: VecDeque<String>,
}

impl LabelDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one chunk of the body.
    pub fn feed(&mut self, chunk: &[u8]) {
        for &byte in chunk {
            if self.after_cr {
                self.after_cr = false;
                if byte == b'\n' {
                    continue;
                }
            }
            match byte {
                b'\n' => self.end_line(),
                b'\r' => {
                    self.end_line();
                    self.after_cr = true;
                }
                _ => self.line.push(byte),
            }
        }
    }

    /// Flush a final unterminated line at end of body.
    pub fn finish(&mut self) {
        self.end_line();
        self.after_cr = false;
    }

    /// Next complete label, if one is buffered.
    pub fn next_label(&mut self) -> Option<String> {
        self.ready.pop_front()
    }

    fn end_line(&mut self) {
        if self.line.is_empty() {
            return;
        }
        let label = decode_ascii(&self.line);
        self.line.clear();
        self.ready.push_back(label);
    }
}

fn decode_ascii(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| if b.is_ascii() { b as char } else { '?' })
        .collect()
}

// ── Pull-based stream ────────────────────────────────────────────────────

struct DemuxState<S> {
    body: Pin<Box<S>>,
    decoder: LabelDecoder,
    cancel: CancellationToken,
    eof: bool,
}

/// Split a byte stream into labels.
///
/// The returned stream ends after the first error (including
/// [`LabelzoomError::Cancelled`]).
pub fn demux<S, B, E>(body: S, cancel: CancellationToken) -> LabelStream
where
    S: Stream<Item = std::result::Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send,
    E: Into<LabelzoomError> + Send,
{
    let state = DemuxState {
        body: Box::pin(body),
        decoder: LabelDecoder::new(),
        cancel,
        eof: false,
    };

    Box::pin(stream::unfold(Some(state), |state| async move {
        let mut st = state?;
        loop {
            if st.cancel.is_cancelled() {
                return Some((Err(LabelzoomError::Cancelled), None));
            }
            if let Some(label) = st.decoder.next_label() {
                return Some((Ok(label), Some(st)));
            }
            if st.eof {
                return None;
            }
            match st.body.next().await {
                Some(Ok(chunk)) => st.decoder.feed(chunk.as_ref()),
                Some(Err(e)) => return Some((Err(e.into()), None)),
                None => {
                    st.decoder.finish();
                    st.eof = true;
                }
            }
        }
    }))
}

// ── ZplRequest streaming execution ───────────────────────────────────────

impl ZplRequest<'_> {
    /// POST to the streaming endpoint and return the labels as a stream.
    ///
    /// The stream owns the response, so it may outlive this request.
    pub async fn labels(&mut self, cancel: CancellationToken) -> Result<LabelStream> {
        let response = self.send(ApiVersion::Streaming).await?;
        Ok(demux(response.bytes_stream(), cancel))
    }

    /// Convert and hand each label to `on_label`, waiting for it to finish
    /// before reading the next one.
    ///
    /// If `on_label` fails, no further labels are read and its error is
    /// returned. Wrap foreign errors with [`LabelzoomError::callback`].
    pub async fn stream<F, Fut>(&mut self, on_label: F) -> Result<()>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        self.stream_with_cancel(on_label, &CancellationToken::new())
            .await
    }

    /// Like [`Self::stream`], failing with `Cancelled` at the next checkpoint
    /// once `cancel` fires. Labels delivered before that are kept.
    pub async fn stream_with_cancel<F, Fut>(
        &mut self,
        mut on_label: F,
        cancel: &CancellationToken,
    ) -> Result<()>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let mut labels = self.labels(cancel.clone()).await?;
        let mut delivered = 0usize;
        while let Some(label) = labels.next().await {
            let label = label.inspect_err(|e| {
                debug!("Label stream stopped after {} labels: {}", delivered, e)
            })?;
            delivered += 1;
            on_label(label).await.inspect_err(|e| {
                debug!("Label handler failed on label {}: {}", delivered, e)
            })?;
        }
        info!("Streamed {} labels", delivered);
        Ok(())
    }
}
