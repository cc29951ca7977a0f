// ABOUTME: Branding settings endpoints for the calling dietitian
// ABOUTME: Reads fall back to default branding; writes replace the whole document
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Branding routes

use std::sync::Arc;

use axum::{extract::State, http::HeaderMap, routing::get, Json, Router};

use crate::auth::authenticate;
use crate::errors::AppResult;
use crate::models::Branding;
use crate::resources::ServerResources;

/// Branding routes implementation
pub struct BrandingRoutes;

impl BrandingRoutes {
    /// Create branding routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/branding",
                get(Self::handle_get).put(Self::handle_save),
            )
            .with_state(resources)
    }

    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> AppResult<Json<Branding>> {
        let user = authenticate(&headers)?;
        let branding = resources.database.get_branding(&user.user_id).await?;
        Ok(Json(branding))
    }

    async fn handle_save(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(branding): Json<Branding>,
    ) -> AppResult<Json<Branding>> {
        let user = authenticate(&headers)?;
        let saved = resources
            .database
            .save_branding(&user.user_id, &branding)
            .await?;
        tracing::info!(user.id = %user.user_id, "Branding saved");
        Ok(Json(saved))
    }
}
