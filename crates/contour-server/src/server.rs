//! HTTP server.
//!
//! Accepts HTTP/1.1 connections on a tokio listener, buffers each request
//! body and hands the request to an [`App`]. Bodies larger than the
//! multipart `max_body_size` are refused with 413 while still streaming in.
//!
//! # Example
//!
//! ```rust,no_run
//! use contour_core::{schema, Endpoint, InputSchemas, Output};
//! use contour_server::{App, Server, ServerConfig};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let app = App::new().with_endpoint(
//!         Endpoint::get("/:username")
//!             .input(InputSchemas::new().params(schema::object().field("username", schema::string())))
//!             .handle_sync(|input| {
//!                 let name = input.param("username").unwrap_or_default();
//!                 Ok(Output::json(json!({ "message": format!("Hello {name}") })))
//!             }),
//!     )?;
//!
//!     let config = ServerConfig::builder().http_addr("0.0.0.0:8080").build();
//!     Server::new(config, app).run().await?;
//!     Ok(())
//! }
//! ```

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use contour_core::ErrorEnvelope;
use http::{Request, StatusCode};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::{TcpListener, TcpStream};

use crate::app::App;
use crate::config::ServerConfig;
use crate::encode::{json_response, HttpResponse};
use crate::error::{ServerError, ServerResult};
use crate::shutdown::{ConnectionTracker, ShutdownSignal};

/// An HTTP server running an [`App`].
#[derive(Debug)]
pub struct Server {
    config: ServerConfig,
    app: App,
}

impl Server {
    /// Creates a server. The config's pipeline settings replace the app's.
    #[must_use]
    pub fn new(config: ServerConfig, mut app: App) -> Self {
        app.set_options(config.pipeline());
        Self { config, app }
    }

    /// Returns the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the app.
    #[must_use]
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Runs until SIGTERM or SIGINT.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid or cannot be bound.
    pub async fn run(self) -> ServerResult<()> {
        let shutdown = ShutdownSignal::with_os_signals();
        self.run_with_shutdown(shutdown).await
    }

    /// Binds the configured address and runs until `shutdown` triggers.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid or cannot be bound.
    pub async fn run_with_shutdown(self, shutdown: ShutdownSignal) -> ServerResult<()> {
        let addr = self
            .config
            .socket_addr()
            .map_err(|source| ServerError::InvalidAddress {
                addr: self.config.http_addr().to_string(),
                source,
            })?;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;

        self.serve(listener, shutdown).await
    }

    /// Serves connections from an already bound listener until `shutdown`
    /// triggers, then waits up to the shutdown timeout for open
    /// connections.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener's local address cannot be read.
    pub async fn serve(self, listener: TcpListener, shutdown: ShutdownSignal) -> ServerResult<()> {
        let local_addr = listener.local_addr()?;
        tracing::info!(addr = %local_addr, endpoints = self.app.len(), "server listening");

        let server = Arc::new(self);
        let tracker = ConnectionTracker::new();

        loop {
            tokio::select! {
                result = listener.accept() => {
                    match result {
                        Ok((stream, remote_addr)) => {
                            let server = Arc::clone(&server);
                            let token = tracker.acquire();
                            let shutdown = shutdown.clone();

                            tokio::spawn(async move {
                                if let Err(error) = server.handle_connection(stream, remote_addr, shutdown).await {
                                    tracing::error!(%remote_addr, %error, "connection error");
                                }
                                drop(token);
                            });
                        }
                        Err(error) => {
                            tracing::error!(%error, "failed to accept connection");
                        }
                    }
                }

                () = shutdown.recv() => {
                    tracing::info!("shutdown signal received, stopping server");
                    break;
                }
            }
        }

        let shutdown_timeout = server.config.shutdown_timeout();
        tracing::info!(
            timeout = ?shutdown_timeout,
            active = tracker.active_connections(),
            "waiting for connections to close"
        );

        tokio::select! {
            () = tracker.drained() => {
                tracing::info!("all connections closed");
            }
            () = tokio::time::sleep(shutdown_timeout) => {
                tracing::warn!(
                    active = tracker.active_connections(),
                    "shutdown timeout reached with connections still open"
                );
            }
        }

        tracing::info!("server stopped");
        Ok(())
    }

    async fn handle_connection(
        self: &Arc<Self>,
        stream: TcpStream,
        remote_addr: SocketAddr,
        shutdown: ShutdownSignal,
    ) -> Result<(), hyper::Error> {
        let io = TokioIo::new(stream);
        let server = Arc::clone(self);

        let service = service_fn(move |request: Request<Incoming>| {
            let server = Arc::clone(&server);
            async move { server.handle_request(request).await }
        });

        let conn = http1::Builder::new().serve_connection(io, service);
        tokio::pin!(conn);

        tokio::select! {
            result = conn.as_mut() => result,
            () = shutdown.recv() => {
                tracing::debug!(%remote_addr, "draining connection");
                conn.as_mut().graceful_shutdown();
                conn.await
            }
        }
    }

    async fn handle_request(
        self: &Arc<Self>,
        request: Request<Incoming>,
    ) -> Result<HttpResponse, Infallible> {
        let timeout = self.config.request_timeout();
        let limit = self.app.options().multipart.max_body_size;
        let (parts, body) = request.into_parts();

        let body = match tokio::time::timeout(timeout, collect_body(body, limit)).await {
            Ok(Ok(body)) => body,
            Ok(Err(error)) if error.is::<LengthLimitError>() => {
                tracing::warn!(limit, "request body exceeds the size limit");
                return Ok(envelope(StatusCode::PAYLOAD_TOO_LARGE, "Request body too large"));
            }
            Ok(Err(error)) => {
                tracing::warn!(%error, "failed to read request body");
                return Ok(envelope(StatusCode::BAD_REQUEST, "Failed to read request body"));
            }
            Err(_) => {
                tracing::warn!("request body timed out");
                return Ok(envelope(StatusCode::REQUEST_TIMEOUT, "Request body timed out"));
            }
        };

        let method = parts.method.clone();
        let path = parts.uri.path().to_string();
        let request = Request::from_parts(parts, body);

        match tokio::time::timeout(timeout, self.app.handle(request)).await {
            Ok(response) => Ok(response),
            Err(_) => {
                tracing::warn!(%method, %path, "request timed out");
                Ok(envelope(StatusCode::GATEWAY_TIMEOUT, "Request timed out"))
            }
        }
    }
}

type BodyError = Box<dyn std::error::Error + Send + Sync>;

async fn collect_body<B>(body: B, limit: usize) -> Result<Bytes, BodyError>
where
    B: hyper::body::Body,
    B::Error: Into<BodyError>,
{
    Ok(Limited::new(body, limit).collect().await?.to_bytes())
}

fn envelope(status: StatusCode, message: &str) -> HttpResponse {
    json_response(status, &ErrorEnvelope::new(message).to_value())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_new_applies_pipeline_options() {
        let config = ServerConfig::builder()
            .input_error_status(StatusCode::BAD_REQUEST)
            .build();
        let server = Server::new(config, App::new());
        assert_eq!(
            server.app().options().input_error_status,
            StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn test_invalid_address() {
        let config = ServerConfig::builder().http_addr("nowhere").build();
        let error = Server::new(config, App::new())
            .run_with_shutdown(ShutdownSignal::new())
            .await
            .unwrap_err();
        assert!(matches!(error, ServerError::InvalidAddress { .. }));
    }

    #[tokio::test]
    async fn test_serve_stops_on_shutdown() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let shutdown = ShutdownSignal::new();
        let config = ServerConfig::builder()
            .shutdown_timeout(Duration::from_millis(100))
            .build();

        let handle = tokio::spawn(Server::new(config, App::new()).serve(listener, shutdown.clone()));
        shutdown.trigger();

        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("server should stop")
            .expect("task should not panic")
            .expect("serve should succeed");
    }

    #[tokio::test]
    async fn test_collect_body_enforces_limit() {
        let body = http_body_util::Full::new(Bytes::from_static(b"0123456789"));
        let error = collect_body(body, 4).await.unwrap_err();
        assert!(error.is::<LengthLimitError>());

        let body = http_body_util::Full::new(Bytes::from_static(b"0123"));
        assert_eq!(collect_body(body, 4).await.unwrap(), Bytes::from_static(b"0123"));
    }

    #[test]
    fn test_envelope() {
        let response = envelope(StatusCode::REQUEST_TIMEOUT, "Request body timed out");
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    }
}
