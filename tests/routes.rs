//! Route table, content negotiation, and echo endpoint behavior, exercised
//! against the full router without a real socket.

mod common;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use flate2::read::GzDecoder;
use ipconf::build_router;
use ipconf::config::ServerConfig;
use std::io::Read;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceExt;

const PEER: &str = "192.0.2.7:54321";

fn router(config: ServerConfig) -> Router {
    build_router(Arc::new(config))
}

fn request(method: &str, uri: &str) -> Request<Body> {
    request_with_body(method, uri, Body::empty())
}

fn request_with_body(method: &str, uri: &str, body: Body) -> Request<Body> {
    let mut req = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::USER_AGENT, "curl/8.0")
        .header(header::HOST, "example.com")
        .header(header::ACCEPT, "*/*")
        .body(body)
        .unwrap();
    req.extensions_mut()
        .insert(ConnectInfo::<SocketAddr>(PEER.parse().unwrap()));
    req
}

async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn gunzip(bytes: &[u8]) -> String {
    let mut decoder = GzDecoder::new(bytes);
    let mut out = String::new();
    decoder.read_to_string(&mut out).unwrap();
    out
}

#[tokio::test]
async fn test_field_endpoints_return_request_facts() {
    let dir = common::template_dir();
    let app = router(common::test_config(&dir));

    let cases = [
        ("/ip", "192.0.2.7"),
        ("/user-agent", "curl/8.0"),
        ("/host", "example.com"),
        ("/proto", "HTTP/1.1"),
        ("/accept", "*/*"),
        ("/accept-encoding", ""),
    ];

    for (path, expected) in cases {
        let response = app.clone().oneshot(request("GET", path)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "path {path}");
        assert_eq!(body_string(response).await, expected, "path {path}");
    }
}

#[tokio::test]
async fn test_dispatch_is_case_insensitive() {
    let dir = common::template_dir();
    let app = router(common::test_config(&dir));

    let response = app.oneshot(request("GET", "/IP")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "192.0.2.7");
}

#[tokio::test]
async fn test_field_endpoints_carry_server_header() {
    let dir = common::template_dir();
    let app = router(common::test_config(&dir));

    let response = app.oneshot(request("GET", "/ip")).await.unwrap();
    let server = response.headers().get(header::SERVER).unwrap();
    assert_eq!(
        server.to_str().unwrap(),
        format!("ipconf {}", env!("CARGO_PKG_VERSION"))
    );
}

#[tokio::test]
async fn test_index_renders_all_fields() {
    let dir = common::template_dir();
    let app = router(common::test_config(&dir));

    let response = app.oneshot(request("GET", "/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/html; charset=utf-8"
    );
    let body = body_string(response).await;
    assert!(body.contains("<h1>192.0.2.7</h1>"));
    assert!(body.contains("<td>User-Agent</td><td>curl/8.0</td>"));
    assert!(body.contains("<td>Proto</td><td>HTTP/1.1</td>"));
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let dir = common::template_dir();
    let app = router(common::test_config(&dir));

    let response = app.oneshot(request("GET", "/nope")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_string(response).await;
    assert!(body.contains("/nope not found"));
}

#[tokio::test]
async fn test_query_echo_returns_raw_query() {
    let dir = common::template_dir();
    let app = router(common::test_config(&dir));

    let response = app
        .clone()
        .oneshot(request("GET", "/GET?a=1&b=2"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "a=1&b=2");

    let response = app.oneshot(request("POST", "/GET?a=1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_string(response).await.contains("method not GET"));
}

#[tokio::test]
async fn test_body_echo_streams_body_back() {
    let dir = common::template_dir();
    let app = router(common::test_config(&dir));

    let response = app
        .clone()
        .oneshot(request_with_body("POST", "/POST", Body::from("hello")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "hello");

    let response = app.oneshot(request("GET", "/POST")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_string(response).await.contains("method not POST"));
}

#[tokio::test]
async fn test_gzip_negotiation_round_trip() {
    let dir = common::template_dir();

    let mut plain_config = common::test_config(&dir);
    plain_config.templates.enable_gzip = false;
    let mut gzip_config = common::test_config(&dir);
    gzip_config.templates.enable_gzip = true;

    let mut req = request("GET", "/");
    req.headers_mut()
        .insert(header::ACCEPT_ENCODING, "gzip".parse().unwrap());
    let plain = router(plain_config).oneshot(req).await.unwrap();
    assert!(plain.headers().get(header::CONTENT_ENCODING).is_none());
    let plain_body = body_string(plain).await;

    let mut req = request("GET", "/");
    req.headers_mut()
        .insert(header::ACCEPT_ENCODING, "gzip".parse().unwrap());
    let compressed = router(gzip_config).oneshot(req).await.unwrap();
    assert_eq!(
        compressed.headers().get(header::CONTENT_ENCODING).unwrap(),
        "gzip"
    );
    let bytes = axum::body::to_bytes(compressed.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(gunzip(&bytes), plain_body);
}

#[tokio::test]
async fn test_gzip_requires_accept_encoding() {
    let dir = common::template_dir();
    let app = router(common::test_config(&dir));

    // enable_gzip defaults to true, but the client did not ask for it.
    let response = app.oneshot(request("GET", "/")).await.unwrap();
    assert!(response.headers().get(header::CONTENT_ENCODING).is_none());
}

#[tokio::test]
async fn test_forwarded_header_honored_only_behind_trusted_proxy() {
    let dir = common::template_dir();

    let mut req = request("GET", "/ip");
    req.headers_mut()
        .insert("x-forwarded-for", "203.0.113.9".parse().unwrap());
    let app = router(common::test_config(&dir));
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(body_string(response).await, "192.0.2.7");

    let mut trusted = common::test_config(&dir);
    trusted.listener.trust_forwarded_for = true;
    let mut req = request("GET", "/ip");
    req.headers_mut()
        .insert("x-forwarded-for", "203.0.113.9".parse().unwrap());
    let response = router(trusted).oneshot(req).await.unwrap();
    assert_eq!(body_string(response).await, "203.0.113.9");
}

#[tokio::test]
async fn test_forwarded_header_feeds_the_index_page() {
    let dir = common::template_dir();
    let mut config = common::test_config(&dir);
    config.listener.trust_forwarded_for = true;

    let mut req = request("GET", "/");
    req.headers_mut()
        .insert("x-forwarded-for", "203.0.113.9".parse().unwrap());
    let response = router(config).oneshot(req).await.unwrap();
    let body = body_string(response).await;
    assert!(body.contains("<h1>203.0.113.9</h1>"));
}

#[tokio::test]
async fn test_robots_served_verbatim() {
    let dir = common::template_dir();
    let app = router(common::test_config(&dir));

    let response = app.oneshot(request("GET", "/robots.txt")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "User-agent: *\nDisallow: /\n");
}

#[tokio::test]
async fn test_missing_static_file_is_not_found() {
    let dir = common::template_dir();
    let app = router(common::test_config(&dir));

    // The fixture directory ships no favicon.
    let response = app.oneshot(request("GET", "/favicon.ico")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_string(response).await.contains("/favicon.ico"));
}

#[tokio::test]
async fn test_missing_index_template_is_internal_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = ServerConfig::default();
    config.templates.dir = dir.path().display().to_string();
    let app = router(config);

    let response = app.oneshot(request("GET", "/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
