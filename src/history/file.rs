// ABOUTME: JSON file session history store, one document per recording
// ABOUTME: Layout is <root>/<user>/<exercise>/<timestamp>.json with sortable timestamps
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{validate_user_id, HistoryKey, HistoryStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use formiq_core::errors::HistoryError;
use formiq_core::models::{ExerciseId, SessionSummary};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

const EXTENSION: &str = "json";

/// History store writing one JSON file per session
#[derive(Debug, Clone)]
pub struct FileHistoryStore {
    root: PathBuf,
}

impl FileHistoryStore {
    /// Store rooted at `root`; directories are created on first write
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File that holds the summary stored under `key`
    #[must_use]
    pub fn path_for(&self, key: &HistoryKey) -> PathBuf {
        self.exercise_dir(&key.user_id, &key.exercise)
            .join(format!("{}.{EXTENSION}", key.timestamp_component()))
    }

    fn exercise_dir(&self, user_id: &str, exercise: &ExerciseId) -> PathBuf {
        self.root.join(user_id).join(exercise.as_str())
    }

    /// Summary files in `dir`, sorted by name (and therefore by time)
    async fn summary_files(dir: &Path) -> Result<Vec<PathBuf>, HistoryError> {
        let mut entries = match fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => return Err(error.into()),
        };

        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == EXTENSION) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    async fn subdirectories(dir: &Path) -> Result<Vec<PathBuf>, HistoryError> {
        let mut entries = match fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => return Err(error.into()),
        };

        let mut dirs = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() {
                dirs.push(entry.path());
            }
        }
        dirs.sort();
        Ok(dirs)
    }

    async fn read_summary(path: &Path) -> Result<SessionSummary, HistoryError> {
        let contents = fs::read_to_string(path).await?;
        serde_json::from_str(&contents).map_err(|e| {
            HistoryError::Serialization(format!("{}: {e}", path.display()))
        })
    }
}

#[async_trait]
impl HistoryStore for FileHistoryStore {
    async fn latest(
        &self,
        user_id: &str,
        exercise: &ExerciseId,
        before: DateTime<Utc>,
    ) -> Result<Option<SessionSummary>, HistoryError> {
        validate_user_id(user_id)?;
        if exercise.is_empty() {
            return Ok(None);
        }

        let cutoff = HistoryKey::new(user_id, exercise, before)?;
        let cutoff_path = self.path_for(&cutoff);
        let files = Self::summary_files(&self.exercise_dir(user_id, exercise)).await?;

        let Some(path) = files.into_iter().rev().find(|path| *path < cutoff_path) else {
            return Ok(None);
        };
        debug!(path = %path.display(), "Prior session summary found");
        Self::read_summary(&path).await.map(Some)
    }

    async fn save(&self, summary: &SessionSummary) -> Result<HistoryKey, HistoryError> {
        let key = HistoryKey::for_summary(summary)?;
        let path = self.path_for(&key);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).await?;
        }

        let json = serde_json::to_string_pretty(summary)?;
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, json).await?;
        fs::rename(&staging, &path).await?;

        info!(key = %key, path = %path.display(), "Session summary saved");
        Ok(key)
    }

    async fn list(&self, user_id: &str) -> Result<Vec<SessionSummary>, HistoryError> {
        validate_user_id(user_id)?;

        let mut summaries = Vec::new();
        for dir in Self::subdirectories(&self.root.join(user_id)).await? {
            for path in Self::summary_files(&dir).await? {
                summaries.push(Self::read_summary(&path).await?);
            }
        }
        summaries.sort_by(|a, b| {
            a.recorded_at
                .cmp(&b.recorded_at)
                .then_with(|| a.exercise.cmp(&b.exercise))
        });
        Ok(summaries)
    }
}
