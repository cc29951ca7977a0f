// ABOUTME: Diet plan persistence with per-client and per-dietitian listings
// ABOUTME: Plans are listed newest first and updated with last-write-wins semantics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row};
use uuid::Uuid;

use super::{parse_timestamp, Database};
use crate::errors::{AppError, AppResult};
use crate::models::{DietPlan, DietPlanUpdate, NewDietPlan, PlanStatus};

const PLAN_COLUMNS: &str = "id, dietitian_id, client_id, title, raw_input, generated_plan, \
    status, notes, created_at, updated_at";

impl Database {
    pub(super) async fn migrate_plans(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS diet_plans (
                id TEXT PRIMARY KEY,
                dietitian_id TEXT NOT NULL,
                client_id TEXT NOT NULL,
                title TEXT NOT NULL,
                raw_input TEXT NOT NULL DEFAULT '',
                generated_plan TEXT,
                status TEXT NOT NULL DEFAULT 'draft' CHECK (status IN ('draft', 'final')),
                notes TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_diet_plans_dietitian ON diet_plans(dietitian_id, created_at)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_diet_plans_client ON diet_plans(client_id, created_at)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Store a new plan for `dietitian_id`
    ///
    /// # Errors
    ///
    /// Returns an error if the client ID or title is blank or the insert fails
    pub async fn create_plan(&self, dietitian_id: &str, new_plan: NewDietPlan) -> AppResult<DietPlan> {
        if new_plan.client_id.trim().is_empty() {
            return Err(AppError::missing_field("Client ID is required"));
        }
        if new_plan.title.trim().is_empty() {
            return Err(AppError::missing_field("Plan title is required"));
        }

        let now = Utc::now();
        let plan = DietPlan {
            id: Uuid::new_v4().to_string(),
            dietitian_id: dietitian_id.to_owned(),
            client_id: new_plan.client_id,
            title: new_plan.title,
            raw_input: new_plan.raw_input,
            generated_plan: new_plan.generated_plan,
            status: new_plan.status.unwrap_or_default(),
            notes: new_plan.notes,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r"
            INSERT INTO diet_plans (
                id, dietitian_id, client_id, title, raw_input, generated_plan,
                status, notes, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            ",
        )
        .bind(&plan.id)
        .bind(&plan.dietitian_id)
        .bind(&plan.client_id)
        .bind(&plan.title)
        .bind(&plan.raw_input)
        .bind(plan.generated_plan.as_deref())
        .bind(plan.status.as_str())
        .bind(&plan.notes)
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create diet plan: {e}")))?;

        Ok(plan)
    }

    /// Fetch one plan owned by `dietitian_id`
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if no such plan belongs to the dietitian
    pub async fn get_plan(&self, dietitian_id: &str, plan_id: &str) -> AppResult<DietPlan> {
        let row = sqlx::query(&format!(
            "SELECT {PLAN_COLUMNS} FROM diet_plans WHERE dietitian_id = $1 AND id = $2"
        ))
        .bind(dietitian_id)
        .bind(plan_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to fetch diet plan: {e}")))?
        .ok_or_else(|| AppError::not_found(format!("Diet plan {plan_id}")))?;

        Self::row_to_plan(&row)
    }

    /// Plans written for one client, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list_plans_for_client(
        &self,
        dietitian_id: &str,
        client_id: &str,
    ) -> AppResult<Vec<DietPlan>> {
        let rows = sqlx::query(&format!(
            "SELECT {PLAN_COLUMNS} FROM diet_plans \
             WHERE dietitian_id = $1 AND client_id = $2 ORDER BY created_at DESC"
        ))
        .bind(dietitian_id)
        .bind(client_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list diet plans: {e}")))?;

        rows.iter().map(Self::row_to_plan).collect()
    }

    /// All plans of a dietitian, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list_plans_for_dietitian(&self, dietitian_id: &str) -> AppResult<Vec<DietPlan>> {
        let rows = sqlx::query(&format!(
            "SELECT {PLAN_COLUMNS} FROM diet_plans WHERE dietitian_id = $1 ORDER BY created_at DESC"
        ))
        .bind(dietitian_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list diet plans: {e}")))?;

        rows.iter().map(Self::row_to_plan).collect()
    }

    /// Apply a partial update; the stored document is overwritten as a whole
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the plan does not belong to the dietitian
    pub async fn update_plan(
        &self,
        dietitian_id: &str,
        plan_id: &str,
        update: DietPlanUpdate,
    ) -> AppResult<DietPlan> {
        let mut plan = self.get_plan(dietitian_id, plan_id).await?;
        plan.apply(update, Utc::now());

        sqlx::query(
            r"
            UPDATE diet_plans SET
                title = $1, raw_input = $2, generated_plan = $3, status = $4,
                notes = $5, updated_at = $6
            WHERE dietitian_id = $7 AND id = $8
            ",
        )
        .bind(&plan.title)
        .bind(&plan.raw_input)
        .bind(plan.generated_plan.as_deref())
        .bind(plan.status.as_str())
        .bind(&plan.notes)
        .bind(plan.updated_at.to_rfc3339())
        .bind(dietitian_id)
        .bind(plan_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update diet plan: {e}")))?;

        Ok(plan)
    }

    /// Delete a plan
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the plan does not belong to the dietitian
    pub async fn delete_plan(&self, dietitian_id: &str, plan_id: &str) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM diet_plans WHERE dietitian_id = $1 AND id = $2")
            .bind(dietitian_id)
            .bind(plan_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete diet plan: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Diet plan {plan_id}")));
        }
        Ok(())
    }

    fn row_to_plan(row: &SqliteRow) -> AppResult<DietPlan> {
        let status: String = row.try_get("status")?;
        let created_at: String = row.try_get("created_at")?;
        let updated_at: String = row.try_get("updated_at")?;

        Ok(DietPlan {
            id: row.try_get("id")?,
            dietitian_id: row.try_get("dietitian_id")?,
            client_id: row.try_get("client_id")?,
            title: row.try_get("title")?,
            raw_input: row.try_get("raw_input")?,
            generated_plan: row.try_get("generated_plan")?,
            status: PlanStatus::from_str_lossy(&status),
            notes: row.try_get("notes")?,
            created_at: parse_timestamp(&created_at)?,
            updated_at: parse_timestamp(&updated_at)?,
        })
    }
}
