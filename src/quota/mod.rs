// ABOUTME: Daily per-user quota gate in front of AI plan generation
// ABOUTME: Store trait with atomic check-and-consume plus the gate that reports remaining uses
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Usage Quota
//!
//! Every generation request consumes one unit from a counter keyed by user and
//! UTC calendar day. Stores perform the read, limit check and increment as a
//! single atomic operation so concurrent requests can never exceed the limit.

mod memory;
mod sqlite;

pub use memory::InMemoryUsageStore;
pub use sqlite::SqliteUsageStore;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::constants::quota::limit_reached_message;
use crate::errors::AppResult;
use crate::models::{UsageRecord, UsageSummary};

/// Result of one atomic check-and-consume against a store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumeOutcome {
    /// A unit was consumed; carries the counter after the increment
    Consumed(u32),
    /// The limit was already reached; carries the unchanged counter
    Denied(u32),
}

/// Persistence for per-user-per-day usage counters
#[async_trait]
pub trait UsageStore: Send + Sync {
    /// Atomically consume one unit if the counter is below `limit`
    ///
    /// A missing record is created at 1. A limit of 0 never creates a record.
    async fn check_and_consume(
        &self,
        user_id: &str,
        date: NaiveDate,
        limit: u32,
    ) -> AppResult<ConsumeOutcome>;

    /// Read the stored record without modifying it
    async fn get_usage(&self, user_id: &str, date: NaiveDate) -> AppResult<Option<UsageRecord>>;
}

/// Outcome reported to callers of the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaDecision {
    /// Whether the caller may proceed
    pub allowed: bool,
    /// Units left for the day after this call
    pub remaining: u32,
    /// Daily limit
    pub limit: u32,
}

impl QuotaDecision {
    /// User-facing message for a denied decision
    #[must_use]
    pub fn denial_message(&self) -> Option<String> {
        (!self.allowed).then(|| limit_reached_message(self.limit))
    }
}

/// Fixed daily limit enforced over a [`UsageStore`]
#[derive(Clone)]
pub struct QuotaGate {
    store: Arc<dyn UsageStore>,
    limit: u32,
}

impl QuotaGate {
    /// Create a gate with the given store and daily limit
    #[must_use]
    pub fn new(store: Arc<dyn UsageStore>, limit: u32) -> Self {
        Self { store, limit }
    }

    /// Daily limit
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Consume one unit for `user_id` on `date` if the limit allows
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written
    pub async fn check_and_consume(&self, user_id: &str, date: NaiveDate) -> AppResult<QuotaDecision> {
        if self.limit == 0 {
            return Ok(QuotaDecision {
                allowed: false,
                remaining: 0,
                limit: 0,
            });
        }

        let decision = match self.store.check_and_consume(user_id, date, self.limit).await? {
            ConsumeOutcome::Consumed(used) => QuotaDecision {
                allowed: true,
                remaining: self.limit.saturating_sub(used),
                limit: self.limit,
            },
            ConsumeOutcome::Denied(used) => {
                info!(user.id = %user_id, %date, used, limit = self.limit, "AI generation quota exhausted");
                QuotaDecision {
                    allowed: false,
                    remaining: 0,
                    limit: self.limit,
                }
            }
        };

        debug!(
            user.id = %user_id,
            %date,
            allowed = decision.allowed,
            quota.remaining = decision.remaining,
            "Quota checked"
        );
        Ok(decision)
    }

    /// Consume one unit for the current UTC day
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written
    pub async fn check_and_consume_today(&self, user_id: &str) -> AppResult<QuotaDecision> {
        self.check_and_consume(user_id, Utc::now().date_naive()).await
    }

    /// Usage summary without consuming anything
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read
    pub async fn usage(&self, user_id: &str, date: NaiveDate) -> AppResult<UsageSummary> {
        let used = self
            .store
            .get_usage(user_id, date)
            .await?
            .map_or(0, |record| record.generations_used);
        Ok(UsageSummary::new(used, self.limit))
    }
}
