// ABOUTME: SQLite document store for clients, diet plans, branding and AI usage counters
// ABOUTME: Owns the connection pool and creates all tables on startup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Database Management
//!
//! Each record type gets its own file with an `impl Database` block holding
//! its migration and CRUD operations. Writes are last-write-wins; nothing here
//! spans more than one document.

mod branding;
mod clients;
mod plans;

use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::errors::{AppError, AppResult};

/// Database manager for the document store
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if missing) the database at `database_url` and run migrations
    ///
    /// In-memory URLs get a single-connection pool so every query sees the
    /// same database.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid, the file cannot be created, or
    /// a migration fails
    pub async fn new(database_url: &str) -> AppResult<Self> {
        let in_memory = database_url.contains(":memory:");

        if !in_memory {
            Self::ensure_parent_dir(database_url).await?;
        }

        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::config(format!("Invalid DATABASE_URL '{database_url}': {e}")))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(if in_memory { 1 } else { 5 })
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        let db = Self { pool };
        db.migrate().await?;

        info!(in_memory, "Database ready");
        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if any table or index creation fails
    pub async fn migrate(&self) -> AppResult<()> {
        self.migrate_clients().await?;
        self.migrate_plans().await?;
        self.migrate_branding().await?;
        self.migrate_ai_usage().await?;
        debug!("Database migrations complete");
        Ok(())
    }

    /// Cheap liveness probe used by the readiness endpoint
    ///
    /// # Errors
    ///
    /// Returns an error if the database does not answer
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn migrate_ai_usage(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS ai_usage (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                date TEXT NOT NULL,
                generations_used INTEGER NOT NULL DEFAULT 0,
                last_updated TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_ai_usage_user_date ON ai_usage(user_id, date)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn ensure_parent_dir(database_url: &str) -> AppResult<()> {
        let path = database_url
            .trim_start_matches("sqlite://")
            .trim_start_matches("sqlite:");
        let path = path.split('?').next().unwrap_or(path);

        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    AppError::config(format!(
                        "Cannot create database directory {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }
        Ok(())
    }
}

/// Parse an RFC 3339 timestamp column
fn parse_timestamp(value: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::database(format!("Invalid timestamp '{value}': {e}")))
}

/// Decode a JSON string-array column
fn parse_string_list(column: &str, value: &str) -> AppResult<Vec<String>> {
    serde_json::from_str(value).map_err(|e| {
        AppError::database(format!("Invalid JSON list in column '{column}': {e}")).with_source(e)
    })
}
