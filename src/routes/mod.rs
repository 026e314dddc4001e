//! Routers and the assembled application.

mod common;
mod resources;


pub use common::common_routes;
pub use resources::resource_routes;

use crate::state::AppState;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Full application: common and resource routes with request tracing and a
/// body size limit of `body_limit` bytes.
pub fn app(state: AppState, body_limit: usize) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .merge(resource_routes(state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(body_limit)),
        )
}
