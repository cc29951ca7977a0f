// ABOUTME: Diet plan document model with draft/final lifecycle
// ABOUTME: Stores the dietitian's raw input next to the generated plan text
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a diet plan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    /// Still being edited
    #[default]
    Draft,
    /// Delivered to the client
    Final,
}

impl PlanStatus {
    /// Database string representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Final => "final",
        }
    }

    /// Parse from the database representation, defaulting to draft
    #[must_use]
    pub fn from_str_lossy(s: &str) -> Self {
        match s {
            "final" => Self::Final,
            _ => Self::Draft,
        }
    }
}

/// A stored diet plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DietPlan {
    /// Document ID
    pub id: String,
    /// Owning dietitian
    pub dietitian_id: String,
    /// Client the plan was written for
    pub client_id: String,
    /// Plan title
    pub title: String,
    /// Dietitian notes fed to the generator
    pub raw_input: String,
    /// Generated plan text, if generation has happened
    pub generated_plan: Option<String>,
    /// Lifecycle state
    pub status: PlanStatus,
    /// Free-form notes
    pub notes: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last update time
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a plan
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewDietPlan {
    /// Client the plan is for
    pub client_id: String,
    /// Plan title
    pub title: String,
    /// Dietitian notes
    pub raw_input: String,
    /// Generated text, when saving right after generation
    pub generated_plan: Option<String>,
    /// Initial status
    pub status: Option<PlanStatus>,
    /// Free-form notes
    pub notes: String,
}

/// Partial update of a plan; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DietPlanUpdate {
    /// New title
    pub title: Option<String>,
    /// New raw input
    pub raw_input: Option<String>,
    /// New generated text
    pub generated_plan: Option<String>,
    /// New status
    pub status: Option<PlanStatus>,
    /// New notes
    pub notes: Option<String>,
}

impl DietPlan {
    /// Apply a partial update in place
    pub fn apply(&mut self, update: DietPlanUpdate, now: DateTime<Utc>) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(raw_input) = update.raw_input {
            self.raw_input = raw_input;
        }
        if let Some(generated_plan) = update.generated_plan {
            self.generated_plan = Some(generated_plan);
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(notes) = update.notes {
            self.notes = notes;
        }
        self.updated_at = now;
    }
}
