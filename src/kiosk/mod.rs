//! Static responder: the kiosk page and the two generated toolkit scripts.
//!
//! # Routes
//! ```text
//! GET /                  → kiosk HTML shell
//! GET /uv/uv.config.js   → generated `__uv$config` script
//! GET /uv.sw.js          → generated service worker
//! ```
//!
//! The toolkit's own bundle and handler scripts are not generated here; they are
//! relayed from the CDN by [`crate::cdn`].
//!
//! # Design Decisions
//! - Builders are pure functions of the configuration
//! - Output is regenerated per request but byte-identical for a given config

pub mod pages;

pub use pages::{kiosk_page, service_worker_script, uv_config_script};

/// Kiosk landing page.
pub const INDEX_PATH: &str = "/";

/// Generated toolkit configuration script.
pub const CONFIG_PATH: &str = "/uv/uv.config.js";

/// Generated service worker script. Served from the root so it may control `/service/`.
pub const SW_PATH: &str = "/uv.sw.js";

/// Toolkit bundle, relayed from the CDN.
pub const BUNDLE_PATH: &str = "/uv/uv.bundle.js";

/// Toolkit request handler, relayed from the CDN.
pub const HANDLER_PATH: &str = "/uv/uv.handler.js";

/// Every path served by the application router.
pub const APP_PATHS: [&str; 5] = [INDEX_PATH, CONFIG_PATH, SW_PATH, BUNDLE_PATH, HANDLER_PATH];
