// ABOUTME: Route module organization and router assembly for the NutriPlan HTTP API
// ABOUTME: Merges domain routers and applies tracing, CORS, timeout and body limit layers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Route module for the `NutriPlan` server
//!
//! Each domain module holds route definitions and thin handlers that
//! delegate to the database and service layers.

/// AI generation and usage routes
pub mod ai;
/// Branding settings routes
pub mod branding;
/// Client profile routes
pub mod clients;
/// Banner, health and readiness routes
pub mod health;
/// Diet plan routes
pub mod plans;

pub use ai::AiRoutes;
pub use branding::BrandingRoutes;
pub use clients::ClientRoutes;
pub use health::HealthRoutes;
pub use plans::PlanRoutes;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{StatusCode, Uri},
    response::IntoResponse,
    Json, Router,
};
use serde_json::json;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::constants::http::{REQUEST_BODY_LIMIT_BYTES, REQUEST_TIMEOUT_GRACE_SECS};
use crate::middleware::{make_request_span, setup_cors};
use crate::resources::ServerResources;

/// Build the complete application router
pub fn build_router(resources: Arc<ServerResources>) -> Router {
    let request_timeout = resources.config.ai.request_timeout
        + Duration::from_secs(REQUEST_TIMEOUT_GRACE_SECS);

    Router::new()
        .merge(HealthRoutes::routes(resources.clone()))
        .merge(AiRoutes::routes(resources.clone()))
        .merge(ClientRoutes::routes(resources.clone()))
        .merge(PlanRoutes::routes(resources.clone()))
        .merge(BrandingRoutes::routes(resources.clone()))
        .fallback(handle_not_found)
        .layer(RequestBodyLimitLayer::new(REQUEST_BODY_LIMIT_BYTES))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(setup_cors(&resources.config))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
}

async fn handle_not_found(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Not Found",
            "message": format!("Route {} not found", uri.path())
        })),
    )
}
