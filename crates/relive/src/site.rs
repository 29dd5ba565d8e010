//! Demo site served behind the live reload middleware.
//!
//! Three routes cover the cases the middleware distinguishes: a full HTML
//! document, an HTML fragment without a content type, and a JSON endpoint.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::response::{Html, Response};
use axum::routing::get;
use axum::{Json, Router};
use relive_middleware::ServerStartTime;
use serde::Serialize;

/// State shared by the demo handlers.
pub(crate) struct SiteState {
    /// Page title.
    pub(crate) title: String,
    /// Server start time, shown on the index page.
    pub(crate) start_time: ServerStartTime,
    /// Whether the middleware wraps the site.
    pub(crate) live_reload: bool,
}

/// Response for GET /api/status.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusResponse {
    title: String,
    start_time: ServerStartTime,
    live_reload: bool,
}

/// Create the demo site router.
pub(crate) fn site_router(state: Arc<SiteState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/fragment", get(fragment))
        .route("/api/status", get(status))
        .with_state(state)
}

async fn index(State(state): State<Arc<SiteState>>) -> Html<String> {
    let title = escape_html(&state.title);
    Html(format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n</head>\n\
         <body>\n<h1>{title}</h1>\n\
         <p>Server started at <code>{start}</code>. Restart the server and this page reloads itself.</p>\n\
         <p><a href=\"/fragment\">Fragment</a> · <a href=\"/api/status\">Status</a></p>\n\
         </body>\n\
         </html>\n",
        start = state.start_time.as_unix(),
    ))
}

/// HTML without a `Content-Type`; only body sniffing identifies it.
async fn fragment() -> Response {
    Response::new(Body::from(
        "<body>\n<p>This fragment is served without a content type.</p>\n</body>\n",
    ))
}

async fn status(State(state): State<Arc<SiteState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        title: state.title.clone(),
        start_time: state.start_time,
        live_reload: state.live_reload,
    })
}

/// Escape text for use inside HTML element content.
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
