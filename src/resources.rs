// ABOUTME: Shared server state handed to every route group
// ABOUTME: Holds configuration, the document store and the plan generation service
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Server Resources
//!
//! Built once at startup and shared behind an `Arc` so handlers never
//! recreate pools or HTTP clients.

use std::sync::Arc;
use std::time::Instant;

use crate::config::ServerConfig;
use crate::database::Database;
use crate::llm::LlmProvider;
use crate::quota::{QuotaGate, SqliteUsageStore, UsageStore};
use crate::services::PlanGenerationService;

/// Shared resources for all route handlers
#[derive(Clone)]
pub struct ServerResources {
    /// Server configuration
    pub config: Arc<ServerConfig>,
    /// Document store
    pub database: Arc<Database>,
    /// AI plan generation behind the daily quota
    pub generation: Arc<PlanGenerationService>,
    /// Process start, for uptime reporting
    pub started_at: Instant,
}

impl ServerResources {
    /// Wire resources with quota counters kept in the same database
    #[must_use]
    pub fn new(
        config: Arc<ServerConfig>,
        database: Database,
        provider: Option<Arc<dyn LlmProvider>>,
    ) -> Self {
        let store: Arc<dyn UsageStore> = Arc::new(SqliteUsageStore::new(database.pool().clone()));
        Self::with_usage_store(config, database, provider, store)
    }

    /// Wire resources with an explicit usage store
    #[must_use]
    pub fn with_usage_store(
        config: Arc<ServerConfig>,
        database: Database,
        provider: Option<Arc<dyn LlmProvider>>,
        store: Arc<dyn UsageStore>,
    ) -> Self {
        let quota = QuotaGate::new(store, config.ai.daily_limit);
        let generation =
            PlanGenerationService::new(provider, quota, config.ai.generation_settings());

        Self {
            config,
            database: Arc::new(database),
            generation: Arc::new(generation),
            started_at: Instant::now(),
        }
    }

    /// Quota gate used for generation
    #[must_use]
    pub fn quota(&self) -> &QuotaGate {
        self.generation.quota()
    }
}
