//! Relay to an external bare server process.
//!
//! Plain requests are rewritten to the upstream authority and streamed through
//! the pooled hyper client. Upgrade requests are forwarded with their
//! `Connection`/`Upgrade` headers intact; once the upstream switches protocols
//! both upgraded connections are spliced together.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{
        uri::{Authority, PathAndQuery, Scheme},
        Request, StatusCode, Uri, Version,
    },
    response::Response,
};
use futures_util::future::BoxFuture;
use hyper::{body::Incoming, upgrade::OnUpgrade};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::{TokioExecutor, TokioIo},
};

use crate::bare::BareEngine;
use crate::config::BareConfig;
use crate::http::response::plain_response;
use crate::net::ConnectionLease;
use crate::routing::matcher::PathPrefix;
use crate::security::headers::strip_hop_by_hop;

/// Body returned when the bare server cannot be reached.
pub const BARE_UNREACHABLE: &str = "Bare server unreachable";

/// Errors raised while relaying to the bare server.
#[derive(Debug, thiserror::Error)]
pub enum BareError {
    #[error("invalid bare upstream URI: {0}")]
    InvalidUri(String),

    #[error("bare upstream request failed: {0}")]
    Upstream(#[from] hyper_util::client::legacy::Error),
}

/// [`BareEngine`] that relays bare traffic to a separate bare server.
#[derive(Clone)]
pub struct UpstreamBare {
    matcher: PathPrefix,
    scheme: Scheme,
    authority: Authority,
    client: Client<HttpConnector, Body>,
}

impl UpstreamBare {
    /// Create a relay for the configured prefix and upstream.
    pub fn new(config: &BareConfig) -> Result<Self, BareError> {
        let uri: Uri = config
            .upstream
            .parse()
            .map_err(|_| BareError::InvalidUri(config.upstream.clone()))?;
        let parts = uri.into_parts();
        let authority = parts
            .authority
            .ok_or_else(|| BareError::InvalidUri(config.upstream.clone()))?;
        let scheme = parts.scheme.unwrap_or(Scheme::HTTP);

        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        Ok(Self {
            matcher: PathPrefix::new(config.path_prefix.clone()),
            scheme,
            authority,
            client,
        })
    }

    /// Rewrite an inbound URI to point at the upstream, keeping path and query.
    fn upstream_uri(&self, original: &Uri) -> Result<Uri, BareError> {
        let path_and_query = original
            .path_and_query()
            .cloned()
            .unwrap_or_else(|| PathAndQuery::from_static("/"));

        Uri::builder()
            .scheme(self.scheme.clone())
            .authority(self.authority.clone())
            .path_and_query(path_and_query)
            .build()
            .map_err(|e| BareError::InvalidUri(e.to_string()))
    }

    async fn forward(
        &self,
        req: Request<Body>,
        keep_upgrade: bool,
    ) -> Result<Response<Incoming>, BareError> {
        let (parts, body) = req.into_parts();
        let uri = self.upstream_uri(&parts.uri)?;

        let mut headers = parts.headers;
        strip_hop_by_hop(&mut headers, keep_upgrade);

        let mut forwarded = Request::new(body);
        *forwarded.method_mut() = parts.method;
        *forwarded.uri_mut() = uri;
        // The upstream connection is always HTTP/1.1, whatever the client spoke.
        *forwarded.version_mut() = Version::HTTP_11;
        *forwarded.headers_mut() = headers;

        Ok(self.client.request(forwarded).await?)
    }
}

impl BareEngine for UpstreamBare {
    fn should_route(&self, req: &Request<Body>) -> bool {
        self.matcher.matches(req)
    }

    fn route_request(&self, req: Request<Body>) -> BoxFuture<'static, Response> {
        let this = self.clone();
        Box::pin(async move {
            let path = req.uri().path().to_string();
            match this.forward(req, false).await {
                Ok(response) => response.map(Body::new),
                Err(e) => {
                    tracing::error!(path = %path, error = %e, "Bare upstream request failed");
                    plain_response(StatusCode::BAD_GATEWAY, BARE_UNREACHABLE)
                }
            }
        })
    }

    fn route_upgrade(&self, mut req: Request<Body>) -> BoxFuture<'static, Response> {
        let this = self.clone();
        Box::pin(async move {
            let path = req.uri().path().to_string();
            let client_upgrade = hyper::upgrade::on(&mut req);
            let lease = req.extensions_mut().remove::<Arc<ConnectionLease>>();

            let mut response = match this.forward(req, true).await {
                Ok(response) => response,
                Err(e) => {
                    tracing::error!(path = %path, error = %e, "Bare upstream upgrade failed");
                    return plain_response(StatusCode::BAD_GATEWAY, BARE_UNREACHABLE);
                }
            };

            if response.status() != StatusCode::SWITCHING_PROTOCOLS {
                tracing::debug!(
                    path = %path,
                    status = %response.status(),
                    "Bare upstream declined upgrade"
                );
                return response.map(Body::new);
            }

            let upstream_upgrade = hyper::upgrade::on(&mut response);
            tokio::spawn(tunnel(path, client_upgrade, upstream_upgrade, lease));

            let (parts, _) = response.into_parts();
            Response::from_parts(parts, Body::empty())
        })
    }
}

/// Copy bytes both ways between the two upgraded connections until either closes.
///
/// The client connection's lease is held for the tunnel's whole life, so it
/// keeps its listener slot and stays visible to the shutdown drain.
async fn tunnel(
    path: String,
    client: OnUpgrade,
    upstream: OnUpgrade,
    lease: Option<Arc<ConnectionLease>>,
) {
    let connection_id = lease.as_ref().map(|lease| lease.id());

    let (client, upstream) = match tokio::try_join!(client, upstream) {
        Ok(pair) => pair,
        Err(e) => {
            tracing::warn!(path = %path, error = %e, "Upgrade handshake did not complete");
            return;
        }
    };

    let mut client = TokioIo::new(client);
    let mut upstream = TokioIo::new(upstream);

    match tokio::io::copy_bidirectional(&mut client, &mut upstream).await {
        Ok((from_client, from_upstream)) => {
            tracing::debug!(
                path = %path,
                connection_id = ?connection_id,
                from_client,
                from_upstream,
                "Bare tunnel closed"
            );
        }
        Err(e) => {
            tracing::debug!(path = %path, error = %e, "Bare tunnel ended with error");
        }
    }
}
