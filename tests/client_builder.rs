//! Client configuration and transport ownership.

mod common;

use common::{pdf_fixture, MockService, SLOW_RESPONSE, TOKEN};
use labelzoom_sdk::{ClientOptions, LabelzoomClient, LabelzoomError, DEFAULT_ENDPOINT};
use std::time::Duration;

#[test]
fn build_without_token_is_configuration_invalid() {
    let err = LabelzoomClient::builder()
        .endpoint("http://localhost:8080")
        .unwrap()
        .build()
        .unwrap_err();
    assert!(matches!(err, LabelzoomError::ConfigurationInvalid(_)));
    assert!(err.to_string().contains("Token is required"));
}

#[test]
fn builder_records_every_setting() {
    let builder = LabelzoomClient::builder()
        .token("abc")
        .unwrap()
        .endpoint("https://staging.labelzoom.net/")
        .unwrap()
        .timeout(Duration::from_secs(5))
        .unwrap()
        .user_agent("label-printer/2.1")
        .unwrap();
    let opts = builder.options();
    assert_eq!(opts.endpoint, "https://staging.labelzoom.net/");
    assert_eq!(opts.timeout, Some(Duration::from_secs(5)));
    assert_eq!(opts.user_agent, "label-printer/2.1");

    let client = builder.build().unwrap();
    assert_eq!(client.endpoint(), "https://staging.labelzoom.net");
    assert_eq!(client.timeout(), Some(Duration::from_secs(5)));
    assert!(client.owns_transport());
}

#[test]
fn options_struct_can_be_used_directly() {
    let mut opts = ClientOptions::new("abc");
    assert_eq!(opts.endpoint, DEFAULT_ENDPOINT);
    opts.timeout = Some(Duration::ZERO);
    assert!(matches!(
        LabelzoomClient::from_options(opts),
        Err(LabelzoomError::ConfigurationInvalid(_))
    ));

    let mut opts = ClientOptions::new("abc");
    opts.http_client = Some(reqwest::Client::new());
    opts.dispose_http_client = false;
    let client = LabelzoomClient::from_options(opts).unwrap();
    assert!(!client.owns_transport());
}

#[test]
fn supplied_transport_ownership_flag() {
    let borrowed = LabelzoomClient::builder()
        .token("abc")
        .unwrap()
        .http_client(reqwest::Client::new())
        .build()
        .unwrap();
    assert!(!borrowed.owns_transport());

    let disposed = LabelzoomClient::builder()
        .token("abc")
        .unwrap()
        .http_client(reqwest::Client::new())
        .dispose_http_client(true)
        .build()
        .unwrap();
    assert!(disposed.owns_transport());
}

#[tokio::test]
async fn trailing_slash_endpoint_hits_the_same_routes() {
    let mock = MockService::start().await;
    let pdf = pdf_fixture();
    let client = LabelzoomClient::builder()
        .token(TOKEN)
        .unwrap()
        .endpoint(format!("{}/", mock.base_url))
        .unwrap()
        .build()
        .unwrap();

    let zpl = client.pdf_to_zpl(pdf.path()).await.unwrap();
    assert!(zpl.starts_with("^XA"));
    assert_eq!(mock.hits().len(), 1);
}

#[tokio::test]
async fn caller_transport_outlives_the_client() {
    let mock = MockService::start().await;
    let pdf = pdf_fixture();
    let http = reqwest::Client::new();

    let client = LabelzoomClient::builder()
        .token(TOKEN)
        .unwrap()
        .endpoint(&mock.base_url)
        .unwrap()
        .http_client(http.clone())
        .build()
        .unwrap();
    assert!(!client.owns_transport());
    client.pdf_to_zpl(pdf.path()).await.unwrap();
    client.close();

    let health = http
        .get(format!("{}/health", mock.base_url))
        .send()
        .await
        .unwrap();
    assert!(health.status().is_success());
    assert_eq!(health.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn requests_keep_working_while_client_handle_is_dropped() {
    let mock = MockService::start().await;
    let pdf = pdf_fixture();
    let client = mock.client();
    let mut request = client
        .convert()
        .from_pdf(pdf.path())
        .unwrap()
        .to_zpl()
        .unwrap();
    client.close();

    // The request holds its own handle on the configuration and transport.
    let zpl = request.execute().await.unwrap();
    assert!(zpl.ends_with("^XZ"));
}

fn slow_client(mock: &MockService, timeout: Duration, http: reqwest::Client) -> LabelzoomClient {
    LabelzoomClient::builder()
        .token(TOKEN)
        .unwrap()
        .endpoint(format!("{}/slow", mock.base_url))
        .unwrap()
        .timeout(timeout)
        .unwrap()
        .http_client(http)
        .build()
        .unwrap()
}

#[tokio::test]
async fn timeout_applies_to_supplied_transport() {
    let mock = MockService::start().await;
    let pdf = pdf_fixture();
    // The supplied client has no timeout of its own.
    let client = slow_client(&mock, Duration::from_millis(100), reqwest::Client::new());

    let started = std::time::Instant::now();
    let err = client.pdf_to_zpl(pdf.path()).await.unwrap_err();
    match err {
        LabelzoomError::Transport(e) => assert!(e.is_timeout(), "got: {e}"),
        other => panic!("expected Transport timeout, got {other}"),
    }
    assert!(started.elapsed() < SLOW_RESPONSE);
}

#[tokio::test]
async fn timeout_applies_to_owned_transport() {
    let mock = MockService::start().await;
    let pdf = pdf_fixture();
    let client = LabelzoomClient::builder()
        .token(TOKEN)
        .unwrap()
        .endpoint(format!("{}/slow", mock.base_url))
        .unwrap()
        .timeout(Duration::from_millis(100))
        .unwrap()
        .build()
        .unwrap();
    assert!(client.owns_transport());

    let err = client.pdf_to_zpl(pdf.path()).await.unwrap_err();
    assert!(matches!(err, LabelzoomError::Transport(ref e) if e.is_timeout()), "got: {err}");
}

#[tokio::test]
async fn generous_timeout_lets_slow_response_through() {
    let mock = MockService::start().await;
    let pdf = pdf_fixture();
    let client = slow_client(&mock, Duration::from_secs(30), reqwest::Client::new());
    assert_eq!(client.pdf_to_zpl(pdf.path()).await.unwrap(), "^XA^XZ");
}

#[tokio::test]
async fn unreachable_endpoint_is_a_transport_error() {
    let pdf = pdf_fixture();
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = LabelzoomClient::builder()
        .token(TOKEN)
        .unwrap()
        .endpoint(format!("http://{addr}"))
        .unwrap()
        .build()
        .unwrap();
    let err = client.pdf_to_zpl(pdf.path()).await.unwrap_err();
    assert!(matches!(err, LabelzoomError::Transport(_)), "got: {err}");
    assert_eq!(err.status(), None);
}
