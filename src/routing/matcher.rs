//! Path prefix predicate used to claim requests for the bare engine.
//!
//! Comparison is a raw, case-sensitive `starts_with` on the request path. The
//! path is not percent-decoded or normalised first.

use axum::http::Request;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPrefix {
    prefix: String,
}

impl PathPrefix {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn matches_path(&self, path: &str) -> bool {
        path.starts_with(&self.prefix)
    }

    pub fn matches<B>(&self, req: &Request<B>) -> bool {
        self.matches_path(req.uri().path())
    }
}
