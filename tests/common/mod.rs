//! In-process mock of the LabelZoom conversion service.
//!
//! Serves both conversion flavours on `127.0.0.1:0` and records every hit so
//! tests can assert on the exact path, query, headers, and upload size.

#![allow(dead_code)]

use axum::body::{Body, Bytes};
use axum::extract::{Path, RawQuery, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use labelzoom_sdk::LabelzoomClient;
use std::io::Write;
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;
use tempfile::NamedTempFile;

pub const TOKEN: &str = "test-token";

/// Label count served by default; matches the 4x6 sample document.
pub const LABELS: usize = 12;

/// Delay of the `/slow` routes.
pub const SLOW_RESPONSE: Duration = Duration::from_secs(2);

/// One recorded request.
#[derive(Debug, Clone)]
pub struct Hit {
    pub api: &'static str,
    pub format: String,
    pub query: Option<String>,
    pub content_type: Option<String>,
    pub authorization: Option<String>,
    pub body_len: usize,
}

#[derive(Clone)]
struct MockState {
    labels: usize,
    hits: Arc<Mutex<Vec<Hit>>>,
}

pub struct MockService {
    pub base_url: String,
    hits: Arc<Mutex<Vec<Hit>>>,
}

impl MockService {
    pub async fn start() -> Self {
        Self::with_labels(LABELS).await
    }

    pub async fn with_labels(labels: usize) -> Self {
        init_tracing();
        let hits = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            labels,
            hits: Arc::clone(&hits),
        };
        let app = Router::new()
            .route("/api/v2/convert/{format}/to/zpl", post(buffered))
            .route("/api/v2.5/convert/{format}/to/zpl", post(streaming))
            .route("/slow/api/v2/convert/{format}/to/zpl", post(slow))
            .route("/health", get(|| async { "ok" }))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            hits,
        }
    }

    pub fn hits(&self) -> Vec<Hit> {
        self.hits.lock().unwrap().clone()
    }

    /// Client pointed at this mock with the accepted token.
    pub fn client(&self) -> LabelzoomClient {
        self.client_with_token(TOKEN)
    }

    pub fn client_with_token(&self, token: &str) -> LabelzoomClient {
        LabelzoomClient::builder()
            .token(token)
            .unwrap()
            .endpoint(&self.base_url)
            .unwrap()
            .build()
            .unwrap()
    }
}

/// The `n`th label (1-indexed) the mock produces.
pub fn label(n: usize) -> String {
    format!("^XA^FO50,50^A0N,50,50^FDLabel {n}^FS^XZ")
}

pub fn expected_labels(count: usize) -> Vec<String> {
    (1..=count).map(label).collect()
}

/// Temporary file with the given suffix and contents.
pub fn fixture(suffix: &str, contents: &[u8]) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents).unwrap();
    file.flush().unwrap();
    file
}

pub fn pdf_fixture() -> NamedTempFile {
    fixture(".pdf", b"%PDF-1.4\n% mock document\n%%EOF\n")
}

/// Route library logs to the test output; honours `RUST_LOG`.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

// ── Handlers ─────────────────────────────────────────────────────────────

fn record(
    state: &MockState,
    api: &'static str,
    format: String,
    query: Option<String>,
    headers: &HeaderMap,
    body_len: usize,
) -> Result<(), Response> {
    let header_str = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let hit = Hit {
        api,
        format,
        query,
        content_type: header_str(header::CONTENT_TYPE),
        authorization: header_str(header::AUTHORIZATION),
        body_len,
    };
    let authorized = hit.authorization.as_deref() == Some(format!("Bearer {TOKEN}").as_str());
    let known_format = matches!(hit.format.as_str(), "pdf" | "png");
    state.hits.lock().unwrap().push(hit);

    if !authorized {
        return Err((StatusCode::UNAUTHORIZED, "invalid token").into_response());
    }
    if !known_format {
        return Err((StatusCode::UNSUPPORTED_MEDIA_TYPE, "unknown format").into_response());
    }
    Ok(())
}

async fn buffered(
    State(state): State<MockState>,
    Path(format): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Err(rejection) = record(&state, "v2", format, query, &headers, body.len()) {
        return rejection;
    }
    let document = expected_labels(state.labels).join("\n");
    ([(header::CONTENT_TYPE, "text/plain")], document).into_response()
}

/// Answers only after [`SLOW_RESPONSE`], for timeout tests. Mounted under
/// `/slow`, so point a client's endpoint at `{base_url}/slow`.
async fn slow() -> &'static str {
    tokio::time::sleep(SLOW_RESPONSE).await;
    "^XA^XZ"
}

/// One label per line, with mixed line endings and blank lines, delivered in
/// small chunks that split labels mid-way.
async fn streaming(
    State(state): State<MockState>,
    Path(format): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Err(rejection) = record(&state, "v2.5", format, query, &headers, body.len()) {
        return rejection;
    }

    let mut text = String::new();
    for n in 1..=state.labels {
        text.push_str(&label(n));
        text.push_str(if n % 2 == 0 { "\r\n" } else { "\n" });
        if n % 3 == 0 {
            text.push('\n');
        }
    }
    let chunks: Vec<Result<Bytes, std::io::Error>> = text
        .as_bytes()
        .chunks(17)
        .map(|c| Ok(Bytes::copy_from_slice(c)))
        .collect();

    Response::builder()
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from_stream(futures::stream::iter(chunks)))
        .unwrap()
}
