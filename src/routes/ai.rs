// ABOUTME: AI plan generation and daily usage endpoints
// ABOUTME: Thin handlers that resolve caller identity and delegate to the generation service
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! AI routes
//!
//! The caller is identified by the `x-user-id` header. The generation
//! endpoints also accept `userId` in the body for clients that cannot set
//! headers; the header wins when both are present.

use std::sync::Arc;

use axum::{
    extract::State,
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;

use crate::auth::{authenticate, user_id_from_headers};
use crate::errors::AppResult;
use crate::models::UsageSummary;
use crate::resources::ServerResources;
use crate::services::{GenerationOutcome, GenerationRequest};

/// Body returned by a successful generation
#[derive(Debug, Serialize)]
pub struct GenerateDietPlanResponse {
    /// Always `true`; failures use the error envelope
    pub success: bool,
    /// Generated plan and quota state
    #[serde(flatten)]
    pub outcome: GenerationOutcome,
}

/// AI routes implementation
pub struct AiRoutes;

impl AiRoutes {
    /// Create all AI routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/ai/generate-diet-plan",
                post(Self::handle_generate_diet_plan),
            )
            .route("/api/generate-plan", post(Self::handle_generate_diet_plan))
            .route("/api/ai/usage", get(Self::handle_usage))
            .with_state(resources)
    }

    async fn handle_generate_diet_plan(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(mut request): Json<GenerationRequest>,
    ) -> AppResult<Json<GenerateDietPlanResponse>> {
        if let Some(user_id) = user_id_from_headers(&headers) {
            request.user_id = Some(user_id);
        }

        let outcome = resources.generation.generate(request).await?;
        Ok(Json(GenerateDietPlanResponse {
            success: true,
            outcome,
        }))
    }

    async fn handle_usage(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> AppResult<Json<UsageSummary>> {
        let user = authenticate(&headers)?;
        let summary = resources
            .quota()
            .usage(&user.user_id, Utc::now().date_naive())
            .await?;
        Ok(Json(summary))
    }
}
