// ABOUTME: In-process usage store backed by a sharded concurrent map
// ABOUTME: Entry locks make each check-and-consume atomic per user and day
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::{ConsumeOutcome, UsageStore};
use crate::errors::AppResult;
use crate::models::UsageRecord;

/// Usage counters held in memory, lost on restart
///
/// Keys are `(user_id, date)` tuples so user IDs containing `_` can never
/// collide with another user's day.
#[derive(Clone, Default)]
pub struct InMemoryUsageStore {
    records: Arc<DashMap<(String, NaiveDate), UsageRecord>>,
}

impl InMemoryUsageStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored user/day records
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no record has been created yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl UsageStore for InMemoryUsageStore {
    async fn check_and_consume(
        &self,
        user_id: &str,
        date: NaiveDate,
        limit: u32,
    ) -> AppResult<ConsumeOutcome> {
        let outcome = match self.records.entry((user_id.to_owned(), date)) {
            Entry::Occupied(mut occupied) => {
                let record = occupied.get_mut();
                if record.generations_used >= limit {
                    ConsumeOutcome::Denied(record.generations_used)
                } else {
                    record.generations_used += 1;
                    record.last_updated = Utc::now();
                    ConsumeOutcome::Consumed(record.generations_used)
                }
            }
            Entry::Vacant(_) if limit == 0 => ConsumeOutcome::Denied(0),
            Entry::Vacant(vacant) => {
                vacant.insert(UsageRecord {
                    user_id: user_id.to_owned(),
                    date,
                    generations_used: 1,
                    last_updated: Utc::now(),
                });
                ConsumeOutcome::Consumed(1)
            }
        };
        Ok(outcome)
    }

    async fn get_usage(&self, user_id: &str, date: NaiveDate) -> AppResult<Option<UsageRecord>> {
        Ok(self
            .records
            .get(&(user_id.to_owned(), date))
            .map(|entry| entry.value().clone()))
    }
}
