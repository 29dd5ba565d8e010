//! Router construction.
//!
//! Routes the live reload WebSocket and sends everything else through the
//! wrapped service, rewriting HTML responses for development requests.

use std::convert::Infallible;

use axum::Router;
use axum::extract::Request;
use axum::http::{Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use tower::{Service, ServiceExt};

use crate::capture::CapturedResponse;
use crate::classify::{is_development_mode, is_html_response};
use crate::error::LiveReloadError;
use crate::inject::inject_script;
use crate::state::ServerStartTime;
use crate::{LIVERELOAD_PATH, websocket};

/// Create the live reload router around `inner`.
///
/// # Arguments
///
/// * `inner` - Service handling every request except the WebSocket endpoint
/// * `start_time` - Start identifier reported to WebSocket clients
pub(crate) fn create_router<S>(inner: S, start_time: ServerStartTime) -> Router
where
    S: Service<Request, Error = Infallible> + Clone + Send + Sync + 'static,
    S::Response: IntoResponse,
    S::Future: Send,
{
    Router::new()
        .route(LIVERELOAD_PATH, any(websocket::ws_handler))
        .fallback(move |request: Request| intercept(inner.clone(), request))
        .with_state(start_time)
}

/// Run `inner`, instrumenting the response when the request is local.
///
/// HEAD responses carry no body to rewrite, so they keep the inner
/// `Content-Length` untouched.
async fn intercept<S>(inner: S, request: Request) -> Response
where
    S: Service<Request, Error = Infallible>,
    S::Response: IntoResponse,
{
    if request.method() == Method::HEAD || !is_development_mode(&request) {
        return forward(inner, request).await;
    }

    let path = request.uri().path().to_owned();
    let response = forward(inner, request).await;

    match instrument(response, &path).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

async fn forward<S>(inner: S, request: Request) -> Response
where
    S: Service<Request, Error = Infallible>,
    S::Response: IntoResponse,
{
    match inner.oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}

/// Capture a response and inject the live reload script if it is HTML.
///
/// Non-HTML bodies are flushed verbatim with their original status and
/// headers. Bodiless statuses and content-encoded bodies are never rewritten.
async fn instrument(response: Response, path: &str) -> Result<Response, LiveReloadError> {
    let mut captured = CapturedResponse::capture(response).await?;

    if !is_html_response(captured.body(), captured.headers()) || !is_rewritable(&captured) {
        return Ok(captured.into_response());
    }

    let injected = inject_script(captured.body());
    // Framing is recomputed from the new body.
    captured.headers_mut().remove(header::CONTENT_LENGTH);

    tracing::debug!(
        path,
        status = %captured.status(),
        original_len = captured.body().len(),
        injected_len = injected.len(),
        "Injected live reload script"
    );

    captured.set_body(injected);
    Ok(captured.into_response())
}

fn is_rewritable(captured: &CapturedResponse) -> bool {
    let status = captured.status();
    let bodiless = status.is_informational()
        || status == StatusCode::NO_CONTENT
        || status == StatusCode::NOT_MODIFIED;

    !bodiless && !captured.headers().contains_key(header::CONTENT_ENCODING)
}
