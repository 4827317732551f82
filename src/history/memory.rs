// ABOUTME: In-memory session history store backed by an ordered map
// ABOUTME: Shares state across clones, used by tests and sessions without persistence
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{validate_user_id, HistoryKey, HistoryStore};
use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use formiq_core::errors::HistoryError;
use formiq_core::models::{ExerciseId, SessionSummary};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// History store kept in process memory
///
/// Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHistoryStore {
    store: Arc<RwLock<BTreeMap<HistoryKey, SessionSummary>>>,
}

impl InMemoryHistoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored summaries
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    /// Whether nothing has been stored yet
    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn latest(
        &self,
        user_id: &str,
        exercise: &ExerciseId,
        before: DateTime<Utc>,
    ) -> Result<Option<SessionSummary>, HistoryError> {
        validate_user_id(user_id)?;
        let before = before.trunc_subsecs(3);
        let store = self.store.read().await;
        Ok(store
            .iter()
            .filter(|(key, _)| {
                key.user_id == user_id && &key.exercise == exercise && key.recorded_at < before
            })
            .max_by_key(|(key, _)| key.recorded_at)
            .map(|(_, summary)| summary.clone()))
    }

    async fn save(&self, summary: &SessionSummary) -> Result<HistoryKey, HistoryError> {
        let key = HistoryKey::for_summary(summary)?;
        let replaced = self
            .store
            .write()
            .await
            .insert(key.clone(), summary.clone())
            .is_some();
        debug!(key = %key, replaced, "Session summary stored in memory");
        Ok(key)
    }

    async fn list(&self, user_id: &str) -> Result<Vec<SessionSummary>, HistoryError> {
        validate_user_id(user_id)?;
        let store = self.store.read().await;
        let mut summaries: Vec<SessionSummary> = store
            .iter()
            .filter(|(key, _)| key.user_id == user_id)
            .map(|(_, summary)| summary.clone())
            .collect();
        summaries.sort_by(|a, b| {
            a.recorded_at
                .cmp(&b.recorded_at)
                .then_with(|| a.exercise.cmp(&b.exercise))
        });
        Ok(summaries)
    }
}
