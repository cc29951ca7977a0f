// ABOUTME: Diet plan endpoints: formatting, CRUD, parsed sections and branded HTML
// ABOUTME: Every stored plan is scoped to the calling dietitian
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Diet plan routes

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::authenticate;
use crate::errors::{AppResult, ErrorCode};
use crate::models::{DietPlan, DietPlanUpdate, NewDietPlan};
use crate::plans::{
    parse_plan, parse_plan_blocks, parse_plan_sections, render_branded_plan_html,
    render_plan_html, Section,
};
use crate::resources::ServerResources;

/// Body of `POST /api/plans/format`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FormatPlanRequest {
    /// Plan text to structure
    pub content: Option<String>,
}

/// Structured view of plan text
#[derive(Debug, Serialize)]
pub struct FormatPlanResponse {
    /// Flat section sequence
    pub sections: Vec<Section>,
    /// Rendered HTML fragment
    pub html: String,
}

/// Parsed sections of a stored plan
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSectionsResponse {
    /// Plan ID
    pub plan_id: String,
    /// Flat section sequence
    pub sections: Vec<Section>,
}

/// Query parameters for listing plans
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListPlansQuery {
    /// Restrict to one client
    pub client_id: Option<String>,
}

/// Plan list wrapper
#[derive(Debug, Serialize)]
pub struct ListPlansResponse {
    /// Plans, newest first
    pub plans: Vec<DietPlan>,
    /// Number of plans returned
    pub total: usize,
}

/// Diet plan routes implementation
pub struct PlanRoutes;

impl PlanRoutes {
    /// Create all plan routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/plans/format", post(Self::handle_format))
            .route(
                "/api/plans",
                post(Self::handle_create).get(Self::handle_list),
            )
            .route(
                "/api/plans/:id",
                get(Self::handle_get)
                    .put(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .route("/api/plans/:id/sections", get(Self::handle_sections))
            .route("/api/plans/:id/html", get(Self::handle_html))
            .with_state(resources)
    }

    async fn handle_format(Json(request): Json<FormatPlanRequest>) -> Json<FormatPlanResponse> {
        let parsed = parse_plan(request.content.as_deref());
        Json(FormatPlanResponse {
            html: render_plan_html(&parsed.blocks),
            sections: parsed.sections,
        })
    }

    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(new_plan): Json<NewDietPlan>,
    ) -> AppResult<Response> {
        let user = authenticate(&headers)?;

        // Plans may only be attached to the caller's own clients
        if !new_plan.client_id.trim().is_empty() {
            resources
                .database
                .get_client(&user.user_id, &new_plan.client_id)
                .await?;
        }

        let plan = resources.database.create_plan(&user.user_id, new_plan).await?;
        info!(user.id = %user.user_id, plan.id = %plan.id, "Diet plan created");
        Ok((StatusCode::CREATED, Json(plan)).into_response())
    }

    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ListPlansQuery>,
    ) -> AppResult<Json<ListPlansResponse>> {
        let user = authenticate(&headers)?;
        let plans = match query.client_id.as_deref().filter(|id| !id.is_empty()) {
            Some(client_id) => {
                resources
                    .database
                    .list_plans_for_client(&user.user_id, client_id)
                    .await?
            }
            None => resources.database.list_plans_for_dietitian(&user.user_id).await?,
        };
        Ok(Json(ListPlansResponse {
            total: plans.len(),
            plans,
        }))
    }

    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(plan_id): Path<String>,
    ) -> AppResult<Json<DietPlan>> {
        let user = authenticate(&headers)?;
        let plan = resources.database.get_plan(&user.user_id, &plan_id).await?;
        Ok(Json(plan))
    }

    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(plan_id): Path<String>,
        Json(update): Json<DietPlanUpdate>,
    ) -> AppResult<Json<DietPlan>> {
        let user = authenticate(&headers)?;
        let plan = resources
            .database
            .update_plan(&user.user_id, &plan_id, update)
            .await?;
        info!(user.id = %user.user_id, plan.id = %plan.id, status = plan.status.as_str(), "Diet plan updated");
        Ok(Json(plan))
    }

    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(plan_id): Path<String>,
    ) -> AppResult<StatusCode> {
        let user = authenticate(&headers)?;
        resources.database.delete_plan(&user.user_id, &plan_id).await?;
        info!(user.id = %user.user_id, plan.id = %plan_id, "Diet plan deleted");
        Ok(StatusCode::NO_CONTENT)
    }

    async fn handle_sections(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(plan_id): Path<String>,
    ) -> AppResult<Json<PlanSectionsResponse>> {
        let user = authenticate(&headers)?;
        let plan = resources.database.get_plan(&user.user_id, &plan_id).await?;
        let sections = parse_plan_sections(plan.generated_plan.as_deref());
        Ok(Json(PlanSectionsResponse {
            plan_id: plan.id,
            sections,
        }))
    }

    async fn handle_html(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(plan_id): Path<String>,
    ) -> AppResult<Html<String>> {
        let user = authenticate(&headers)?;
        let plan = resources.database.get_plan(&user.user_id, &plan_id).await?;
        let branding = resources.database.get_branding(&user.user_id).await?;

        // The client may have been deleted since the plan was written
        let client_name = match resources
            .database
            .get_client(&user.user_id, &plan.client_id)
            .await
        {
            Ok(client) => client.display_name().to_owned(),
            Err(e) if e.code == ErrorCode::ResourceNotFound => "Client".to_owned(),
            Err(e) => return Err(e),
        };

        let blocks = parse_plan_blocks(plan.generated_plan.as_deref());
        Ok(Html(render_branded_plan_html(
            &blocks,
            &branding,
            &client_name,
        )))
    }
}
