//! Serving real connections.

use std::time::Duration;

use contour_core::{schema, Endpoint, InputSchemas, Output};
use contour_extract::MultipartConfig;
use contour_server::{App, Server, ServerConfig, ShutdownSignal};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

fn app() -> App {
    App::new()
        .with_endpoint(
            Endpoint::post("/echo")
                .input(InputSchemas::new().body(schema::object().field("word", schema::string())))
                .handle_sync(|input| Ok(Output::json(json!({ "echo": input.body["word"] })))),
        )
        .unwrap()
}

async fn exchange(addr: std::net::SocketAddr, request: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request.as_bytes()).await.unwrap();
    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    String::from_utf8(response).unwrap()
}

fn split_body(response: &str) -> (&str, &str) {
    response.split_once("\r\n\r\n").unwrap()
}

#[tokio::test]
async fn test_serves_requests_until_shutdown() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = ShutdownSignal::new();
    let config = ServerConfig::builder()
        .shutdown_timeout(Duration::from_secs(1))
        .build();
    let server = tokio::spawn(Server::new(config, app()).serve(listener, shutdown.clone()));

    let body = r#"{"word":"hi"}"#;
    let request = format!(
        "POST /echo HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\n\
         Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let response = exchange(addr, &request).await;
    let (head, payload) = split_body(&response);
    assert!(head.starts_with("HTTP/1.1 200 OK"));
    assert!(head.to_ascii_lowercase().contains("access-control-allow-origin: *"));
    let payload: Value = serde_json::from_str(payload).unwrap();
    assert_eq!(payload, json!({ "echo": "hi" }));

    let request = "GET /nowhere HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n";
    let response = exchange(addr, request).await;
    let (head, payload) = split_body(&response);
    assert!(head.starts_with("HTTP/1.1 404 Not Found"));
    let payload: Value = serde_json::from_str(payload).unwrap();
    assert_eq!(payload["message"], "Path Not Found");

    shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(3), server)
        .await
        .expect("server should stop")
        .expect("task should not panic")
        .expect("serve should succeed");
}

#[tokio::test]
async fn test_oversized_body_is_refused() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = ShutdownSignal::new();
    let config = ServerConfig::builder()
        .shutdown_timeout(Duration::from_secs(1))
        .multipart(MultipartConfig::new().max_body_size(8))
        .build();
    let server = tokio::spawn(Server::new(config, app()).serve(listener, shutdown.clone()));

    let body = r#"{"word":"far too long"}"#;
    let request = format!(
        "POST /echo HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\n\
         Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let response = exchange(addr, &request).await;
    let (head, payload) = split_body(&response);
    assert!(head.starts_with("HTTP/1.1 413 Payload Too Large"));
    let payload: Value = serde_json::from_str(payload).unwrap();
    assert_eq!(
        payload,
        json!({ "status": "error", "message": "Request body too large" })
    );

    shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(3), server)
        .await
        .expect("server should stop")
        .expect("task should not panic")
        .expect("serve should succeed");
}
