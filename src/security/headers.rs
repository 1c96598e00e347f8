//! Header manipulation for relayed requests.
//!
//! # Responsibilities
//! - Strip hop-by-hop headers before forwarding to the bare server
//! - Keep `Connection`/`Upgrade` on upgrade requests so the upstream can switch protocols
//!
//! # Design Decisions
//! - Headers named by the `Connection` header are hop-by-hop too
//! - End-to-end headers (including `Host`) are forwarded unchanged

use axum::http::{header, HeaderMap, HeaderName};

/// Standard hop-by-hop headers.
const HOP_BY_HOP: [&str; 9] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Remove hop-by-hop headers in place.
///
/// With `keep_upgrade`, `Connection` and `Upgrade` survive so an upgrade
/// handshake can be relayed.
pub fn strip_hop_by_hop(headers: &mut HeaderMap, keep_upgrade: bool) {
    if !keep_upgrade {
        let nominated: Vec<HeaderName> = headers
            .get_all(header::CONNECTION)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(','))
            .filter_map(|token| HeaderName::from_bytes(token.trim().as_bytes()).ok())
            .collect();
        for name in nominated {
            headers.remove(name);
        }
    }

    for name in HOP_BY_HOP {
        if keep_upgrade && matches!(name, "connection" | "upgrade") {
            continue;
        }
        headers.remove(name);
    }
}
