// ABOUTME: Client profile CRUD endpoints plus the per-client plan listing
// ABOUTME: Profiles are scoped to the calling dietitian
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Client routes

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tracing::info;

use crate::auth::authenticate;
use crate::errors::AppResult;
use crate::models::{ClientProfile, DietPlan};
use crate::resources::ServerResources;

/// Client list wrapper
#[derive(Debug, Serialize)]
pub struct ListClientsResponse {
    /// Clients, newest first
    pub clients: Vec<ClientProfile>,
    /// Number of clients returned
    pub total: usize,
}

/// Plans written for one client
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientPlansResponse {
    /// Client ID
    pub client_id: String,
    /// Plans, newest first
    pub plans: Vec<DietPlan>,
}

/// Client routes implementation
pub struct ClientRoutes;

impl ClientRoutes {
    /// Create all client routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/clients",
                get(Self::handle_list).post(Self::handle_create),
            )
            .route(
                "/api/clients/:id",
                get(Self::handle_get)
                    .put(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .route("/api/clients/:id/plans", get(Self::handle_list_plans))
            .with_state(resources)
    }

    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(profile): Json<ClientProfile>,
    ) -> AppResult<Response> {
        let user = authenticate(&headers)?;
        let client = resources
            .database
            .create_client(&user.user_id, &profile)
            .await?;
        info!(user.id = %user.user_id, client.id = %client.id, "Client created");
        Ok((StatusCode::CREATED, Json(client)).into_response())
    }

    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> AppResult<Json<ListClientsResponse>> {
        let user = authenticate(&headers)?;
        let clients = resources.database.list_clients(&user.user_id).await?;
        Ok(Json(ListClientsResponse {
            total: clients.len(),
            clients,
        }))
    }

    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(client_id): Path<String>,
    ) -> AppResult<Json<ClientProfile>> {
        let user = authenticate(&headers)?;
        let client = resources
            .database
            .get_client(&user.user_id, &client_id)
            .await?;
        Ok(Json(client))
    }

    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(client_id): Path<String>,
        Json(profile): Json<ClientProfile>,
    ) -> AppResult<Json<ClientProfile>> {
        let user = authenticate(&headers)?;
        let client = resources
            .database
            .update_client(&user.user_id, &client_id, &profile)
            .await?;
        Ok(Json(client))
    }

    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(client_id): Path<String>,
    ) -> AppResult<StatusCode> {
        let user = authenticate(&headers)?;
        resources
            .database
            .delete_client(&user.user_id, &client_id)
            .await?;
        info!(user.id = %user.user_id, client.id = %client_id, "Client deleted");
        Ok(StatusCode::NO_CONTENT)
    }

    async fn handle_list_plans(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(client_id): Path<String>,
    ) -> AppResult<Json<ClientPlansResponse>> {
        let user = authenticate(&headers)?;
        resources
            .database
            .get_client(&user.user_id, &client_id)
            .await?;
        let plans = resources
            .database
            .list_plans_for_client(&user.user_id, &client_id)
            .await?;
        Ok(Json(ClientPlansResponse { client_id, plans }))
    }
}
