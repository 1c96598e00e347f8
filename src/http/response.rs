//! Response construction.
//!
//! # Responsibilities
//! - Typed representation of generated documents (status, content type, body)
//! - Fixed-message error responses for failures surfaced to clients
//!
//! # Design Decisions
//! - Generated documents stay plain values until the last moment so they can
//!   be asserted on directly
//! - Error bodies are fixed strings; causes go to the log, not the client

use axum::{
    body::Body,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

/// Content type of generated HTML.
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Content type of generated scripts.
pub const JAVASCRIPT_CONTENT_TYPE: &str = "application/javascript; charset=utf-8";

/// A fully generated response body with its status and content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticResponse {
    pub status: StatusCode,
    pub content_type: &'static str,
    pub body: String,
}

impl StaticResponse {
    /// A `200 OK` HTML document.
    pub fn html(body: String) -> Self {
        Self {
            status: StatusCode::OK,
            content_type: HTML_CONTENT_TYPE,
            body,
        }
    }

    /// A `200 OK` script.
    pub fn javascript(body: String) -> Self {
        Self {
            status: StatusCode::OK,
            content_type: JAVASCRIPT_CONTENT_TYPE,
            body,
        }
    }
}

impl IntoResponse for StaticResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, self.content_type)],
            self.body,
        )
            .into_response()
    }
}

/// A plain-text response with a fixed message.
pub fn plain_response(status: StatusCode, message: &'static str) -> Response<Body> {
    (status, message).into_response()
}
