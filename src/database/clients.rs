// ABOUTME: Client profile persistence scoped to the owning dietitian
// ABOUTME: Conditions and allergies are stored as JSON arrays in text columns
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row};
use uuid::Uuid;

use super::{parse_string_list, parse_timestamp, Database};
use crate::errors::{AppError, AppResult};
use crate::models::ClientProfile;

const CLIENT_COLUMNS: &str = "id, dietitian_id, full_name, age, gender, height, weight, \
    medical_conditions, allergies, goals, notes, created_at, updated_at";

impl Database {
    pub(super) async fn migrate_clients(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS clients (
                id TEXT PRIMARY KEY,
                dietitian_id TEXT NOT NULL,
                full_name TEXT NOT NULL,
                age TEXT NOT NULL DEFAULT '',
                gender TEXT NOT NULL DEFAULT '',
                height TEXT NOT NULL DEFAULT '',
                weight TEXT NOT NULL DEFAULT '',
                medical_conditions TEXT NOT NULL DEFAULT '[]',
                allergies TEXT NOT NULL DEFAULT '[]',
                goals TEXT NOT NULL DEFAULT '',
                notes TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_clients_dietitian ON clients(dietitian_id, created_at)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Store a new client for `dietitian_id`, assigning ID and timestamps
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or the insert fails
    pub async fn create_client(
        &self,
        dietitian_id: &str,
        profile: &ClientProfile,
    ) -> AppResult<ClientProfile> {
        if profile.full_name.trim().is_empty() {
            return Err(AppError::missing_field("Client full name is required"));
        }

        let now = Utc::now();
        let client = ClientProfile {
            id: Uuid::new_v4().to_string(),
            dietitian_id: dietitian_id.to_owned(),
            created_at: Some(now),
            updated_at: Some(now),
            ..profile.clone()
        };

        sqlx::query(
            r"
            INSERT INTO clients (
                id, dietitian_id, full_name, age, gender, height, weight,
                medical_conditions, allergies, goals, notes, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $12)
            ",
        )
        .bind(&client.id)
        .bind(&client.dietitian_id)
        .bind(&client.full_name)
        .bind(&client.age)
        .bind(&client.gender)
        .bind(&client.height)
        .bind(&client.weight)
        .bind(serde_json::to_string(&client.medical_conditions)?)
        .bind(serde_json::to_string(&client.allergies)?)
        .bind(&client.goals)
        .bind(&client.notes)
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create client: {e}")))?;

        Ok(client)
    }

    /// Fetch one client owned by `dietitian_id`
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if no such client belongs to the dietitian
    pub async fn get_client(&self, dietitian_id: &str, client_id: &str) -> AppResult<ClientProfile> {
        let row = sqlx::query(&format!(
            "SELECT {CLIENT_COLUMNS} FROM clients WHERE dietitian_id = $1 AND id = $2"
        ))
        .bind(dietitian_id)
        .bind(client_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to fetch client: {e}")))?
        .ok_or_else(|| AppError::not_found(format!("Client {client_id}")))?;

        Self::row_to_client(&row)
    }

    /// All clients of a dietitian, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list_clients(&self, dietitian_id: &str) -> AppResult<Vec<ClientProfile>> {
        let rows = sqlx::query(&format!(
            "SELECT {CLIENT_COLUMNS} FROM clients WHERE dietitian_id = $1 ORDER BY created_at DESC"
        ))
        .bind(dietitian_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list clients: {e}")))?;

        rows.iter().map(Self::row_to_client).collect()
    }

    /// Replace the editable fields of a client
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the client does not belong to the dietitian
    pub async fn update_client(
        &self,
        dietitian_id: &str,
        client_id: &str,
        profile: &ClientProfile,
    ) -> AppResult<ClientProfile> {
        if profile.full_name.trim().is_empty() {
            return Err(AppError::missing_field("Client full name is required"));
        }

        let now = Utc::now();
        let result = sqlx::query(
            r"
            UPDATE clients SET
                full_name = $1, age = $2, gender = $3, height = $4, weight = $5,
                medical_conditions = $6, allergies = $7, goals = $8, notes = $9,
                updated_at = $10
            WHERE dietitian_id = $11 AND id = $12
            ",
        )
        .bind(&profile.full_name)
        .bind(&profile.age)
        .bind(&profile.gender)
        .bind(&profile.height)
        .bind(&profile.weight)
        .bind(serde_json::to_string(&profile.medical_conditions)?)
        .bind(serde_json::to_string(&profile.allergies)?)
        .bind(&profile.goals)
        .bind(&profile.notes)
        .bind(now.to_rfc3339())
        .bind(dietitian_id)
        .bind(client_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update client: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Client {client_id}")));
        }

        self.get_client(dietitian_id, client_id).await
    }

    /// Delete a client; its diet plans are left in place
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the client does not belong to the dietitian
    pub async fn delete_client(&self, dietitian_id: &str, client_id: &str) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM clients WHERE dietitian_id = $1 AND id = $2")
            .bind(dietitian_id)
            .bind(client_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete client: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Client {client_id}")));
        }
        Ok(())
    }

    fn row_to_client(row: &SqliteRow) -> AppResult<ClientProfile> {
        let conditions: String = row.try_get("medical_conditions")?;
        let allergies: String = row.try_get("allergies")?;
        let created_at: String = row.try_get("created_at")?;
        let updated_at: String = row.try_get("updated_at")?;

        Ok(ClientProfile {
            id: row.try_get("id")?,
            dietitian_id: row.try_get("dietitian_id")?,
            full_name: row.try_get("full_name")?,
            age: row.try_get("age")?,
            gender: row.try_get("gender")?,
            height: row.try_get("height")?,
            weight: row.try_get("weight")?,
            medical_conditions: parse_string_list("medical_conditions", &conditions)?,
            allergies: parse_string_list("allergies", &allergies)?,
            goals: row.try_get("goals")?,
            notes: row.try_get("notes")?,
            created_at: Some(parse_timestamp(&created_at)?),
            updated_at: Some(parse_timestamp(&updated_at)?),
        })
    }
}
