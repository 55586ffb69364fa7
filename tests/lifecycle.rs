//! Listener lifecycle over real sockets: multi-listener startup, fail-fast
//! TLS validation, and graceful shutdown.

mod common;

use ipconf::config::validate_config;
use ipconf::lifecycle::{self, StartupError};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

#[tokio::test]
async fn test_three_listeners_plain_and_tls() {
    let dir = common::template_dir();

    let signed = rcgen::generate_simple_self_signed(vec!["localhost".to_string()]).unwrap();
    let cert_path = dir.path().join("cert.pem");
    let key_path = dir.path().join("key.pem");
    std::fs::write(&cert_path, signed.cert.pem()).unwrap();
    std::fs::write(&key_path, signed.signing_key.serialize_pem()).unwrap();

    let mut config = common::test_config(&dir);
    config.listener.endpoint = vec!["127.0.0.1:0".into(), "127.0.0.1:0".into()];
    config.listener.tls_endpoint = vec!["127.0.0.1:0".into()];
    config.listener.tls_cert = Some(cert_path.display().to_string());
    config.listener.tls_key = Some(key_path.display().to_string());
    assert!(validate_config(&config).is_ok());

    let bound = lifecycle::bind(config).await.unwrap();
    let addrs = bound.local_addrs();
    assert_eq!(addrs.len(), 3);
    let run = bound.run_state();
    let server = tokio::spawn(bound.serve());

    for addr in &addrs[..2] {
        let response = reqwest::get(format!("http://{addr}/ip")).await.unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(response.text().await.unwrap(), "127.0.0.1");
    }

    let client = reqwest::Client::builder()
        .danger_accept_invalid_certs(true)
        .build()
        .unwrap();
    let response = client
        .get(format!("https://{}/ip", addrs[2]))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "127.0.0.1");

    run.shutdown(Duration::from_secs(5));
    tokio::time::timeout(Duration::from_secs(10), server)
        .await
        .expect("serve() should return after shutdown")
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn test_invalid_tls_spec_prevents_any_listener() {
    let dir = common::template_dir();
    let mut config = common::test_config(&dir);
    config.listener.tls_endpoint = vec!["127.0.0.1:0".into()];
    config.listener.tls_cert = Some("cert.pem".into());
    config.listener.tls_key = Some(String::new());

    // Validation rejects the spec, and bind() refuses it before any socket
    // would be bound.
    assert!(validate_config(&config).is_err());
    let result = lifecycle::bind(config).await;
    assert!(matches!(result, Err(StartupError::Invalid(_))));
}

#[tokio::test]
async fn test_missing_tls_material_aborts_startup() {
    let dir = common::template_dir();
    let mut config = common::test_config(&dir);
    config.listener.tls_endpoint = vec!["127.0.0.1:0".into()];
    config.listener.tls_cert = Some(dir.path().join("missing-cert.pem").display().to_string());
    config.listener.tls_key = Some(dir.path().join("missing-key.pem").display().to_string());

    let result = lifecycle::bind(config).await;
    assert!(matches!(result, Err(StartupError::Tls(_))));
}

#[tokio::test]
async fn test_graceful_shutdown_stops_accepting() {
    let dir = common::template_dir();
    let mut config = common::test_config(&dir);
    config.listener.endpoint = vec!["127.0.0.1:0".into()];

    let bound = lifecycle::bind(config).await.unwrap();
    let addr = bound.local_addrs()[0];
    let run = bound.run_state();
    let server = tokio::spawn(bound.serve());

    let response = reqwest::get(format!("http://{addr}/ip")).await.unwrap();
    assert_eq!(response.status(), 200);

    run.shutdown(Duration::from_secs(5));
    tokio::time::timeout(Duration::from_secs(10), server)
        .await
        .expect("serve() should return after shutdown")
        .unwrap()
        .unwrap();

    // The socket is gone; new connections must be refused.
    assert!(TcpStream::connect(addr).await.is_err());
}

#[tokio::test]
async fn test_in_flight_request_completes_during_drain() {
    let dir = common::template_dir();
    let mut config = common::test_config(&dir);
    config.listener.endpoint = vec!["127.0.0.1:0".into()];

    let bound = lifecycle::bind(config).await.unwrap();
    let addr = bound.local_addrs()[0];
    let run = bound.run_state();
    let server = tokio::spawn(bound.serve());

    // Start a body-echo request but hold back part of the body.
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(
            b"POST /POST HTTP/1.1\r\nHost: test\r\nContent-Length: 5\r\nConnection: close\r\n\r\nhe",
        )
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    run.shutdown(Duration::from_secs(5));
    tokio::time::sleep(Duration::from_millis(100)).await;

    // The request was in flight when shutdown began; finishing it within
    // the deadline must still produce a full response.
    stream.write_all(b"llo").await.unwrap();
    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    let response = String::from_utf8_lossy(&response);
    assert!(response.contains("200 OK"), "got: {response}");
    assert!(response.contains("he"), "got: {response}");
    assert!(response.contains("llo"), "got: {response}");

    tokio::time::timeout(Duration::from_secs(10), server)
        .await
        .expect("serve() should return after the drain completes")
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn test_stragglers_are_force_closed_at_deadline() {
    let dir = common::template_dir();
    let mut config = common::test_config(&dir);
    config.listener.endpoint = vec!["127.0.0.1:0".into()];

    let bound = lifecycle::bind(config).await.unwrap();
    let addr = bound.local_addrs()[0];
    let run = bound.run_state();
    let server = tokio::spawn(bound.serve());

    // A request that never completes: the body is promised but withheld.
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"POST /POST HTTP/1.1\r\nHost: test\r\nContent-Length: 5\r\n\r\nhe")
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    run.shutdown(Duration::from_millis(250));

    // The serve loop must not wait past the deadline for the straggler.
    tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("serve() should force-close stragglers at the deadline")
        .unwrap()
        .unwrap();

    // The connection was closed underneath the client.
    let mut buf = Vec::new();
    let _ = stream.read_to_end(&mut buf).await;
}
