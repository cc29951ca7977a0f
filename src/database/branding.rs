// ABOUTME: Branding settings persistence, one JSON document per dietitian
// ABOUTME: Missing branding falls back to the default palette and layout
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::Utc;
use sqlx::Row;

use super::{parse_timestamp, Database};
use crate::errors::{AppError, AppResult};
use crate::models::Branding;

impl Database {
    pub(super) async fn migrate_branding(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS branding (
                dietitian_id TEXT PRIMARY KEY,
                settings TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Branding for a dietitian, or the defaults when none has been saved
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored document is corrupt
    pub async fn get_branding(&self, dietitian_id: &str) -> AppResult<Branding> {
        let row = sqlx::query("SELECT settings, updated_at FROM branding WHERE dietitian_id = $1")
            .bind(dietitian_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to fetch branding: {e}")))?;

        let Some(row) = row else {
            return Ok(Branding::default());
        };

        let settings: String = row.try_get("settings")?;
        let updated_at: String = row.try_get("updated_at")?;
        let mut branding: Branding = serde_json::from_str(&settings)?;
        branding.updated_at = Some(parse_timestamp(&updated_at)?);
        Ok(branding)
    }

    /// Insert or replace a dietitian's branding
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for colors that are not hex literals, or a
    /// database error if the write fails
    pub async fn save_branding(&self, dietitian_id: &str, branding: &Branding) -> AppResult<Branding> {
        for color in [&branding.primary_color, &branding.secondary_color] {
            if !Branding::is_valid_color(color) {
                return Err(AppError::invalid_input(format!(
                    "Invalid color '{color}', expected #rgb or #rrggbb"
                )));
            }
        }

        let now = Utc::now();
        let mut saved = branding.clone();
        saved.updated_at = None;
        let settings = serde_json::to_string(&saved)?;

        sqlx::query(
            r"
            INSERT INTO branding (dietitian_id, settings, updated_at)
            VALUES ($1, $2, $3)
            ON CONFLICT(dietitian_id) DO UPDATE SET
                settings = excluded.settings,
                updated_at = excluded.updated_at
            ",
        )
        .bind(dietitian_id)
        .bind(&settings)
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to save branding: {e}")))?;

        saved.updated_at = Some(now);
        Ok(saved)
    }
}
