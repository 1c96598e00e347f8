//! CDN passthrough for the toolkit's prebuilt scripts.
//!
//! # Data Flow
//! ```text
//! GET /uv/uv.bundle.js
//!     → CdnPassthrough::relay(CdnAsset::Bundle)
//!     → GET {cdn_base}{version}/dist/uv.bundle.js
//!     → 2xx: body relayed verbatim as application/javascript
//!     → anything else: 500 "Error loading UV file from CDN"
//! ```
//!
//! # Design Decisions
//! - Always fetched fresh: no caching, no retry
//! - Network errors and non-2xx statuses look the same to the client
//! - No timeout beyond the HTTP client's defaults

use std::time::Instant;

use axum::{
    body::Bytes,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::config::ToolkitConfig;
use crate::http::response::plain_response;
use crate::observability::metrics;

/// Body returned when an asset cannot be fetched.
pub const CDN_ERROR_BODY: &str = "Error loading UV file from CDN";

/// Content type of relayed assets.
pub const ASSET_CONTENT_TYPE: &str = "application/javascript";

/// Toolkit scripts served from the CDN.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CdnAsset {
    /// `uv.bundle.js`: the toolkit core, including the URL codecs.
    Bundle,
    /// `uv.handler.js`: the in-page request handler.
    Handler,
}

impl CdnAsset {
    /// File name inside the toolkit's `dist/` directory.
    pub fn file_name(self) -> &'static str {
        match self {
            CdnAsset::Bundle => "uv.bundle.js",
            CdnAsset::Handler => "uv.handler.js",
        }
    }
}

/// Errors raised while fetching an asset.
#[derive(Debug, thiserror::Error)]
pub enum CdnError {
    #[error("CDN request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("CDN responded with {0}")]
    Status(StatusCode),
}

/// Fetches toolkit assets from the CDN on every request.
#[derive(Debug, Clone)]
pub struct CdnPassthrough {
    client: reqwest::Client,
    toolkit: ToolkitConfig,
}

impl CdnPassthrough {
    /// Create a passthrough with its own HTTP client.
    pub fn new(toolkit: ToolkitConfig) -> Result<Self, CdnError> {
        let mut builder =
            reqwest::Client::builder().user_agent(concat!("uv-kiosk/", env!("CARGO_PKG_VERSION")));
        if !toolkit.system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build()?;
        Ok(Self::with_client(client, toolkit))
    }

    /// Create a passthrough sharing an existing client.
    pub fn with_client(client: reqwest::Client, toolkit: ToolkitConfig) -> Self {
        Self { client, toolkit }
    }

    /// CDN URL of an asset.
    pub fn asset_url(&self, asset: CdnAsset) -> String {
        self.toolkit.asset_url(asset.file_name())
    }

    /// Fetch an asset's bytes. Only 2xx responses count as success.
    pub async fn fetch(&self, asset: CdnAsset) -> Result<Bytes, CdnError> {
        let response = self.client.get(self.asset_url(asset)).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CdnError::Status(status));
        }

        Ok(response.bytes().await?)
    }

    /// Fetch an asset and turn the outcome into a client response.
    pub async fn relay(&self, asset: CdnAsset) -> Response {
        let start = Instant::now();

        match self.fetch(asset).await {
            Ok(bytes) => {
                metrics::record_cdn_fetch(asset.file_name(), "ok", start);
                tracing::debug!(asset = asset.file_name(), bytes = bytes.len(), "Relayed CDN asset");
                ([(header::CONTENT_TYPE, ASSET_CONTENT_TYPE)], bytes).into_response()
            }
            Err(e) => {
                metrics::record_cdn_fetch(asset.file_name(), "error", start);
                tracing::warn!(
                    asset = asset.file_name(),
                    url = %self.asset_url(asset),
                    error = %e,
                    "CDN fetch failed"
                );
                plain_response(StatusCode::INTERNAL_SERVER_ERROR, CDN_ERROR_BODY)
            }
        }
    }
}
