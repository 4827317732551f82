// ABOUTME: Session history persistence abstraction with pluggable backends
// ABOUTME: Reads the latest prior summary for a user and exercise, writes new summaries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Session History
//!
//! Summaries are keyed by user, exercise and recording time. The pipeline
//! reads the most recent earlier summary once per session (for the trend
//! delta) and writes the new summary when the session completes.

/// JSON file store, one file per session
pub mod file;
/// In-memory store for tests and ephemeral sessions
pub mod memory;

pub use file::FileHistoryStore;
pub use memory::InMemoryHistoryStore;

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use formiq_core::errors::HistoryError;
use formiq_core::models::{ExerciseId, SessionSummary};
use std::fmt;

/// Storage key of one session summary
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HistoryKey {
    /// Owner of the recording
    pub user_id: String,
    /// Exercise performed
    pub exercise: ExerciseId,
    /// When the recording was made, truncated to milliseconds
    pub recorded_at: DateTime<Utc>,
}

impl HistoryKey {
    /// Build a key, rejecting components that cannot name a storage entry
    ///
    /// Recording times are truncated to millisecond precision, so two
    /// sessions recorded within the same millisecond share a key in every
    /// backend.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::InvalidKey` for an empty user or exercise, or a
    /// user id containing characters other than ASCII letters, digits, `-`,
    /// `_`, `.` and `@`
    pub fn new(
        user_id: &str,
        exercise: &ExerciseId,
        recorded_at: DateTime<Utc>,
    ) -> Result<Self, HistoryError> {
        validate_user_id(user_id)?;
        if exercise.is_empty() {
            return Err(HistoryError::InvalidKey("exercise id is empty".into()));
        }
        Ok(Self {
            user_id: user_id.to_owned(),
            exercise: exercise.clone(),
            recorded_at: recorded_at.trunc_subsecs(3),
        })
    }

    /// Key of a stored summary
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::InvalidKey` if the summary's user id is unusable
    pub fn for_summary(summary: &SessionSummary) -> Result<Self, HistoryError> {
        Self::new(&summary.user_id, &summary.exercise, summary.recorded_at)
    }

    /// Sortable timestamp component, millisecond precision
    #[must_use]
    pub fn timestamp_component(&self) -> String {
        self.recorded_at.format("%Y%m%dT%H%M%S%3fZ").to_string()
    }
}

impl fmt::Display for HistoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.user_id,
            self.exercise,
            self.timestamp_component()
        )
    }
}

/// Check that a user id can be used as a storage key component
///
/// # Errors
///
/// Returns `HistoryError::InvalidKey` when the id is empty, is `.`/`..`, or
/// contains unsupported characters
pub fn validate_user_id(user_id: &str) -> Result<(), HistoryError> {
    if user_id.is_empty() {
        return Err(HistoryError::InvalidKey("user id is empty".into()));
    }
    if user_id == "." || user_id == ".." {
        return Err(HistoryError::InvalidKey(format!(
            "user id '{user_id}' is reserved"
        )));
    }
    if let Some(bad) = user_id
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '@')))
    {
        return Err(HistoryError::InvalidKey(format!(
            "user id '{user_id}' contains unsupported character '{bad}'"
        )));
    }
    Ok(())
}

/// Session history backend
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Most recent summary for `user_id` and `exercise` recorded strictly
    /// before `before`
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or storage cannot be read
    async fn latest(
        &self,
        user_id: &str,
        exercise: &ExerciseId,
        before: DateTime<Utc>,
    ) -> Result<Option<SessionSummary>, HistoryError>;

    /// Persist a summary, replacing any summary stored under the same key
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or storage cannot be written
    async fn save(&self, summary: &SessionSummary) -> Result<HistoryKey, HistoryError>;

    /// Every summary of a user, oldest first
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or storage cannot be read
    async fn list(&self, user_id: &str) -> Result<Vec<SessionSummary>, HistoryError>;
}
