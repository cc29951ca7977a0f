// ABOUTME: AI usage counter record keyed by user and UTC calendar day
// ABOUTME: Shape of the quota document plus the read-only summary returned to callers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Stored usage counter for one user on one UTC day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageRecord {
    /// Dietitian ID
    pub user_id: String,
    /// UTC calendar day
    pub date: NaiveDate,
    /// Generations consumed that day
    pub generations_used: u32,
    /// Last increment time
    pub last_updated: DateTime<Utc>,
}

impl UsageRecord {
    /// Document key in `userId_YYYY-MM-DD` form
    #[must_use]
    pub fn document_id(user_id: &str, date: NaiveDate) -> String {
        format!("{user_id}_{}", date.format("%Y-%m-%d"))
    }
}

/// Usage as reported to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageSummary {
    /// Generations consumed today
    pub generations_used: u32,
    /// Daily limit
    pub limit: u32,
    /// Generations left today
    pub remaining: u32,
}

impl UsageSummary {
    /// Build a summary from a used count and limit
    #[must_use]
    pub const fn new(generations_used: u32, limit: u32) -> Self {
        Self {
            generations_used,
            limit,
            remaining: limit.saturating_sub(generations_used),
        }
    }
}
