//! Application route table.
//!
//! Everything the bare engine does not claim ends up here: the three generated
//! documents, the two CDN-relayed toolkit scripts and a 404 fallback.

use axum::{
    extract::State,
    http::{HeaderName, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::cdn::CdnAsset;
use crate::http::request::{RequestIdMaker, X_REQUEST_ID};
use crate::http::response::StaticResponse;
use crate::http::server::AppState;
use crate::kiosk::{self, BUNDLE_PATH, CONFIG_PATH, HANDLER_PATH, INDEX_PATH, SW_PATH};

/// Build the application router with its middleware layers.
pub fn app_router(state: AppState) -> Router {
    let request_id = HeaderName::from_static(X_REQUEST_ID);

    Router::new()
        .route(INDEX_PATH, get(index))
        .route(CONFIG_PATH, get(uv_config))
        .route(SW_PATH, get(service_worker))
        .route(BUNDLE_PATH, get(uv_bundle))
        .route(HANDLER_PATH, get(uv_handler))
        .fallback(not_found)
        .with_state(state)
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(request_id, RequestIdMaker))
}

async fn index(State(state): State<AppState>) -> StaticResponse {
    kiosk::kiosk_page(&state.config.toolkit)
}

async fn uv_config(State(state): State<AppState>) -> StaticResponse {
    kiosk::uv_config_script(&state.config.toolkit, &state.config.bare)
}

async fn service_worker() -> StaticResponse {
    kiosk::service_worker_script()
}

async fn uv_bundle(State(state): State<AppState>) -> Response {
    state.cdn.relay(CdnAsset::Bundle).await
}

async fn uv_handler(State(state): State<AppState>) -> Response {
    state.cdn.relay(CdnAsset::Handler).await
}

async fn not_found(method: Method, uri: Uri) -> Response {
    tracing::debug!(method = %method, path = %uri.path(), "No route matched");
    (
        StatusCode::NOT_FOUND,
        format!("Cannot {} {}", method, uri.path()),
    )
        .into_response()
}
