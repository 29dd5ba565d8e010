//! Middleware error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors raised while capturing responses or talking to live reload clients.
#[derive(Debug, thiserror::Error)]
pub enum LiveReloadError {
    /// The wrapped handler's body stream failed while it was being captured.
    #[error("Failed to read response body: {0}")]
    Body(#[source] axum::Error),

    /// The server info message could not be serialized.
    #[error("Failed to encode server info: {0}")]
    Encode(#[from] serde_json::Error),

    /// The WebSocket rejected an outgoing message.
    #[error("Failed to send message: {0}")]
    Send(#[source] axum::Error),
}

impl IntoResponse for LiveReloadError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Live reload middleware error");

        let status = match &self {
            Self::Body(_) => StatusCode::BAD_GATEWAY,
            Self::Encode(_) | Self::Send(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, self.to_string()).into_response()
    }
}
