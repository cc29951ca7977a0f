// ABOUTME: Service banner, health and readiness endpoints
// ABOUTME: Readiness pings the document store before reporting ready
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Health check routes for service monitoring

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::constants::{http::API_VERSION, service::DISPLAY_NAME};
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::resources::ServerResources;

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the banner and health check routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/", get(Self::handle_root))
            .route("/api/health", get(Self::handle_health))
            .route("/api/ready", get(Self::handle_ready))
            .with_state(resources)
    }

    async fn handle_root() -> Json<Value> {
        Json(json!({
            "message": DISPLAY_NAME,
            "version": API_VERSION,
            "status": "running",
            "timestamp": chrono::Utc::now().to_rfc3339()
        }))
    }

    async fn handle_health(State(resources): State<Arc<ServerResources>>) -> Json<Value> {
        Json(json!({
            "status": "healthy",
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "uptime": resources.started_at.elapsed().as_secs(),
            "environment": resources.config.environment.to_string(),
            "version": API_VERSION,
            "aiConfigured": resources.generation.is_configured()
        }))
    }

    async fn handle_ready(State(resources): State<Arc<ServerResources>>) -> AppResult<Json<Value>> {
        resources.database.ping().await.map_err(|e| {
            AppError::new(ErrorCode::ExternalServiceUnavailable, "Database unavailable")
                .with_source(e)
        })?;

        Ok(Json(json!({
            "status": "ready",
            "timestamp": chrono::Utc::now().to_rfc3339()
        })))
    }
}
