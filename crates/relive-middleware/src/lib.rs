//! Live reload middleware for axum development servers.
//!
//! Wraps any service that handles `axum` requests and adds two things:
//! - A WebSocket endpoint at [`LIVERELOAD_PATH`] that tells each browser
//!   when the server started
//! - A small script injected into HTML responses served to `localhost` or
//!   `127.0.0.1`, which reloads the page once a reconnect reports a newer
//!   start time
//!
//! Requests for any other host pass through untouched and unbuffered.
//!
//! # Quick Start
//!
//! ```ignore
//! use axum::Router;
//! use axum::routing::get;
//! use relive_middleware::LiveReloadLayer;
//! use tower::Layer;
//!
//! #[tokio::main]
//! async fn main() {
//!     let site = Router::new().route("/", get(|| async { "<html>...</html>" }));
//!     let app = LiveReloadLayer::new().layer(site);
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► LiveReloadLayer router
//!                        │
//!                        ├─► /ws/livereload ──► server-info message, then idle
//!                        │
//!                        └─► everything else ──► wrapped service
//!                                │
//!                                ├─► remote host: response as-is
//!                                └─► local host: capture ─► classify ─► inject
//! ```

mod app;
mod capture;
mod classify;
mod error;
mod inject;
mod state;
mod websocket;

use std::convert::Infallible;

use axum::Router;
use axum::extract::Request;
use axum::response::IntoResponse;
use tower::{Layer, Service};

pub use capture::CapturedResponse;
pub use classify::{is_development_host, is_development_mode, is_html_response};
pub use error::LiveReloadError;
pub use inject::{LIVERELOAD_SCRIPT, inject_script, inject_snippet};
pub use state::ServerStartTime;

/// Path of the live reload WebSocket endpoint.
pub const LIVERELOAD_PATH: &str = "/ws/livereload";

/// Layer that adds live reload to a service.
///
/// The produced service is a [`Router`]; it owns the WebSocket endpoint and
/// forwards every other request to the wrapped service.
#[derive(Clone, Copy, Debug)]
pub struct LiveReloadLayer {
    start_time: ServerStartTime,
}

impl LiveReloadLayer {
    /// Create a layer reporting the process start time.
    #[must_use]
    pub fn new() -> Self {
        Self::with_start_time(ServerStartTime::process())
    }

    /// Create a layer reporting a given start time.
    ///
    /// Use this to pin the identifier, for example in tests.
    #[must_use]
    pub const fn with_start_time(start_time: ServerStartTime) -> Self {
        Self { start_time }
    }

    /// Start time reported to WebSocket clients.
    #[must_use]
    pub const fn start_time(&self) -> ServerStartTime {
        self.start_time
    }
}

impl Default for LiveReloadLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Layer<S> for LiveReloadLayer
where
    S: Service<Request, Error = Infallible> + Clone + Send + Sync + 'static,
    S::Response: IntoResponse,
    S::Future: Send,
{
    type Service = Router;

    fn layer(&self, inner: S) -> Self::Service {
        app::create_router(inner, self.start_time)
    }
}

/// Wrap `inner` with live reload, reporting the process start time.
pub fn livereload<S>(inner: S) -> Router
where
    S: Service<Request, Error = Infallible> + Clone + Send + Sync + 'static,
    S::Response: IntoResponse,
    S::Future: Send,
{
    LiveReloadLayer::new().layer(inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{StatusCode, header};
    use axum::routing::get;
    use http_body_util::BodyExt;
    use tower::{ServiceBuilder, ServiceExt};

    #[test]
    fn test_layer_keeps_start_time() {
        let start = ServerStartTime::from_unix(42);
        assert_eq!(LiveReloadLayer::with_start_time(start).start_time(), start);
    }

    #[test]
    fn test_new_layers_share_process_start_time() {
        let first = LiveReloadLayer::new();
        std::thread::sleep(std::time::Duration::from_millis(1100));
        let second = LiveReloadLayer::default();

        assert_eq!(first.start_time(), second.start_time());
        assert_eq!(first.start_time(), ServerStartTime::process());
    }

    #[tokio::test]
    async fn test_service_builder_composition() {
        let site = Router::new().route("/", get(|| async { "<html><body>x</body></html>" }));
        let app = ServiceBuilder::new()
            .layer(LiveReloadLayer::new())
            .service(site);

        let request = Request::builder()
            .uri("/")
            .header(header::HOST, "localhost")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert_eq!(body, format!("<html><body>x{LIVERELOAD_SCRIPT}\n</body></html>"));
    }

    #[tokio::test]
    async fn test_livereload_function_wraps_service() {
        let site = Router::new().route("/", get(|| async { "plain" }));
        let request = Request::builder()
            .uri("/")
            .header(header::HOST, "127.0.0.1:7878")
            .body(Body::empty())
            .unwrap();

        let response = livereload(site).oneshot(request).await.unwrap();

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"plain");
    }
}
