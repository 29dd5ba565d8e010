//! Response capturing.
//!
//! Buffers a response's status and body so they can be inspected and
//! rewritten before anything reaches the client. Headers stay in the
//! response head and are never copied.

use axum::body::Body;
use axum::http::response::Parts;
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use http_body_util::BodyExt;

use crate::error::LiveReloadError;

/// A response held back from the client.
///
/// The status defaults to `200 OK` until [`set_status`](Self::set_status) is
/// called. Nothing is sent until the value is turned back into a
/// [`Response`] with [`into_response`](Self::into_response).
#[derive(Debug)]
pub struct CapturedResponse {
    head: Parts,
    body: Vec<u8>,
}

impl CapturedResponse {
    /// Create an empty capture with status `200 OK` and no headers.
    #[must_use]
    pub fn new() -> Self {
        let (head, ()) = Response::new(()).into_parts();
        Self {
            head,
            body: Vec::new(),
        }
    }

    /// Drain a response into a capture.
    ///
    /// Data frames are appended to the buffer in order; trailers are dropped.
    ///
    /// # Errors
    ///
    /// Returns `LiveReloadError::Body` if the body stream yields an error.
    pub async fn capture(response: Response) -> Result<Self, LiveReloadError> {
        let (head, mut body) = response.into_parts();
        let mut captured = Self {
            head,
            body: Vec::new(),
        };

        while let Some(frame) = body.frame().await {
            let frame = frame.map_err(LiveReloadError::Body)?;
            if let Ok(data) = frame.into_data() {
                captured.write(&data);
            }
        }

        Ok(captured)
    }

    /// Append bytes to the body buffer, returning how many were accepted.
    pub fn write(&mut self, data: &[u8]) -> usize {
        self.body.extend_from_slice(data);
        data.len()
    }

    /// Record the status code to send on flush.
    pub fn set_status(&mut self, status: StatusCode) {
        self.head.status = status;
    }

    /// Recorded status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.head.status
    }

    /// Response headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.head.headers
    }

    /// Mutable response headers.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.head.headers
    }

    /// Buffered body bytes.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Replace the buffered body.
    pub fn set_body(&mut self, body: Vec<u8>) {
        self.body = body;
    }

    /// Flush the capture into a response: status, then headers, then body.
    #[must_use]
    pub fn into_response(self) -> Response {
        Response::from_parts(self.head, Body::from(self.body))
    }
}

impl Default for CapturedResponse {
    fn default() -> Self {
        Self::new()
    }
}
