//! Router construction.
//!
//! Builds the axum router: the live reload check endpoint, a fallback
//! serving the build output, and no-cache headers on every response so
//! the browser never serves a stale build from its cache.

use std::sync::Arc;

use axum::Router;
use axum::http::HeaderValue;
use axum::http::header::{self, HeaderName};
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::reload;
use crate::state::AppState;
use crate::static_files;

/// Create the application router.
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(reload::CHECK_PATH, get(reload::check))
        .fallback(static_files::serve_site)
        .layer(
            ServiceBuilder::new()
                .layer(cache_control_layer())
                .layer(pragma_layer())
                .layer(expires_layer()),
        )
        .with_state(state)
}

fn cache_control_layer() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-cache, no-store, must-revalidate"),
    )
}

fn pragma_layer() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(
        HeaderName::from_static("pragma"),
        HeaderValue::from_static("no-cache"),
    )
}

fn expires_layer() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(header::EXPIRES, HeaderValue::from_static("0"))
}
