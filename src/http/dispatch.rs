//! Request dispatch between the bare engine and the application router.
//!
//! # Decision Table
//! ```text
//! bare predicate | upgrade | outcome
//! ---------------+---------+------------------------------------
//! match          | no      | BareEngine::route_request
//! match          | yes     | BareEngine::route_upgrade
//! no match       | no      | application router
//! no match       | yes     | DispatchError → connection closed
//! ```

use std::convert::Infallible;
use std::sync::Arc;

use axum::{body::Body, http::Request, response::Response, Router};
use tower::ServiceExt;

use crate::bare::BareEngine;
use crate::http::request::is_upgrade_request;
use crate::observability::metrics;

/// Raised for requests that must not receive any response.
///
/// hyper closes the connection without writing a response when a service fails.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("upgrade request for {path} does not belong to the bare engine")]
    UnmatchedUpgrade { path: String },
}

/// Routes every inbound request exactly once.
#[derive(Clone)]
pub struct Dispatcher {
    bare: Arc<dyn BareEngine>,
    app: Router,
}

impl Dispatcher {
    pub fn new(bare: Arc<dyn BareEngine>, app: Router) -> Self {
        Self { bare, app }
    }

    /// Dispatch a request to the bare engine or the application router.
    pub async fn dispatch(&self, req: Request<Body>) -> Result<Response, DispatchError> {
        let upgrade = is_upgrade_request(&req);

        if self.bare.should_route(&req) {
            tracing::debug!(
                method = %req.method(),
                path = %req.uri().path(),
                upgrade,
                "Dispatching to bare engine"
            );
            metrics::record_dispatch("bare");
            let response = if upgrade {
                self.bare.route_upgrade(req).await
            } else {
                self.bare.route_request(req).await
            };
            return Ok(response);
        }

        if upgrade {
            let path = req.uri().path().to_string();
            tracing::debug!(path = %path, "Closing connection for unmatched upgrade");
            metrics::record_dispatch("rejected_upgrade");
            return Err(DispatchError::UnmatchedUpgrade { path });
        }

        metrics::record_dispatch("app");
        Ok(self
            .app
            .clone()
            .oneshot(req)
            .await
            .unwrap_or_else(|never: Infallible| match never {}))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use futures_util::future::BoxFuture;

    #[derive(Default)]
    struct FakeBare {
        requests: AtomicUsize,
        upgrades: AtomicUsize,
    }

    impl BareEngine for FakeBare {
        fn should_route(&self, req: &Request<Body>) -> bool {
            req.uri().path().starts_with("/bare/")
        }

        fn route_request(&self, _req: Request<Body>) -> BoxFuture<'static, Response> {
            self.requests.fetch_add(1, Ordering::SeqCst);
            Box::pin(async { (StatusCode::IM_A_TEAPOT, "bare").into_response() })
        }

        fn route_upgrade(&self, _req: Request<Body>) -> BoxFuture<'static, Response> {
            self.upgrades.fetch_add(1, Ordering::SeqCst);
            Box::pin(async { StatusCode::SWITCHING_PROTOCOLS.into_response() })
        }
    }

    /// Router that counts every request it sees.
    fn counting_app(hits: Arc<AtomicUsize>) -> Router {
        Router::new().fallback(move || {
            let hits = hits.clone();
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                "app"
            }
        })
    }

    fn request(path: &str) -> Request<Body> {
        Request::builder().uri(path).body(Body::empty()).unwrap()
    }

    fn upgrade(path: &str) -> Request<Body> {
        Request::builder()
            .uri(path)
            .header("Connection", "Upgrade")
            .header("Upgrade", "websocket")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn bare_paths_never_reach_app() {
        let fake = Arc::new(FakeBare::default());
        let hits = Arc::new(AtomicUsize::new(0));
        let dispatcher = Dispatcher::new(fake.clone(), counting_app(hits.clone()));

        for path in ["/bare/", "/bare/v3/", "/bare/uv/uv.config.js"] {
            let response = dispatcher.dispatch(request(path)).await.unwrap();
            assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
        }

        assert_eq!(fake.requests.load(Ordering::SeqCst), 3);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn other_paths_reach_app() {
        let fake = Arc::new(FakeBare::default());
        let hits = Arc::new(AtomicUsize::new(0));
        let dispatcher = Dispatcher::new(fake.clone(), counting_app(hits.clone()));

        for path in ["/", "/uv/uv.bundle.js", "/service/abc", "/barely"] {
            let response = dispatcher.dispatch(request(path)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        assert_eq!(hits.load(Ordering::SeqCst), 4);
        assert_eq!(fake.requests.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn bare_upgrades_go_to_upgrade_handler() {
        let fake = Arc::new(FakeBare::default());
        let hits = Arc::new(AtomicUsize::new(0));
        let dispatcher = Dispatcher::new(fake.clone(), counting_app(hits.clone()));

        let response = dispatcher.dispatch(upgrade("/bare/v3/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SWITCHING_PROTOCOLS);
        assert_eq!(fake.upgrades.load(Ordering::SeqCst), 1);
        assert_eq!(fake.requests.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unmatched_upgrade_is_rejected() {
        let fake = Arc::new(FakeBare::default());
        let hits = Arc::new(AtomicUsize::new(0));
        let dispatcher = Dispatcher::new(fake.clone(), counting_app(hits.clone()));

        let err = dispatcher.dispatch(upgrade("/")).await.unwrap_err();
        assert!(matches!(err, DispatchError::UnmatchedUpgrade { ref path } if path == "/"));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(fake.upgrades.load(Ordering::SeqCst), 0);
    }
}
