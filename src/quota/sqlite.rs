// ABOUTME: SQLite usage store using a single conditional upsert per check-and-consume
// ABOUTME: Records live in the ai_usage table keyed by userId_YYYY-MM-DD
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use super::{ConsumeOutcome, UsageStore};
use crate::errors::{AppError, AppResult};
use crate::models::UsageRecord;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Usage counters persisted in SQLite
#[derive(Clone)]
pub struct SqliteUsageStore {
    pool: SqlitePool,
}

impl SqliteUsageStore {
    /// Create a store over an existing pool (schema created by `Database::migrate`)
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_record(row: &SqliteRow) -> AppResult<UsageRecord> {
        let date: String = row.try_get("date")?;
        let used: i64 = row.try_get("generations_used")?;
        let last_updated: String = row.try_get("last_updated")?;

        Ok(UsageRecord {
            user_id: row.try_get("user_id")?,
            date: NaiveDate::parse_from_str(&date, DATE_FORMAT)
                .map_err(|e| AppError::database(format!("Invalid usage date '{date}': {e}")))?,
            generations_used: u32::try_from(used).unwrap_or(u32::MAX),
            last_updated: DateTime::parse_from_rfc3339(&last_updated)
                .map_err(|e| AppError::database(format!("Invalid usage timestamp: {e}")))?
                .with_timezone(&Utc),
        })
    }
}

#[async_trait]
impl UsageStore for SqliteUsageStore {
    async fn check_and_consume(
        &self,
        user_id: &str,
        date: NaiveDate,
        limit: u32,
    ) -> AppResult<ConsumeOutcome> {
        if limit == 0 {
            let used = self
                .get_usage(user_id, date)
                .await?
                .map_or(0, |r| r.generations_used);
            return Ok(ConsumeOutcome::Denied(used));
        }

        // One statement: insert at 1, or increment only while below the limit.
        // No row comes back when the existing counter is already at the limit.
        let consumed = sqlx::query(
            r"
            INSERT INTO ai_usage (id, user_id, date, generations_used, last_updated)
            VALUES ($1, $2, $3, 1, $4)
            ON CONFLICT(id) DO UPDATE SET
                generations_used = ai_usage.generations_used + 1,
                last_updated = excluded.last_updated
            WHERE ai_usage.generations_used < $5
            RETURNING generations_used
            ",
        )
        .bind(UsageRecord::document_id(user_id, date))
        .bind(user_id)
        .bind(date.format(DATE_FORMAT).to_string())
        .bind(Utc::now().to_rfc3339())
        .bind(i64::from(limit))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update AI usage: {e}")))?;

        if let Some(row) = consumed {
            let used: i64 = row.try_get("generations_used")?;
            return Ok(ConsumeOutcome::Consumed(
                u32::try_from(used).unwrap_or(u32::MAX),
            ));
        }

        let used = self
            .get_usage(user_id, date)
            .await?
            .map_or(limit, |r| r.generations_used);
        Ok(ConsumeOutcome::Denied(used))
    }

    async fn get_usage(&self, user_id: &str, date: NaiveDate) -> AppResult<Option<UsageRecord>> {
        let row = sqlx::query(
            r"
            SELECT user_id, date, generations_used, last_updated
            FROM ai_usage
            WHERE id = $1
            ",
        )
        .bind(UsageRecord::document_id(user_id, date))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to read AI usage: {e}")))?;

        row.as_ref().map(Self::row_to_record).transpose()
    }
}
