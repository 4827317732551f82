// ABOUTME: Normalized exercise identifier used to key rubrics and history
// ABOUTME: Maps display names like "Bench Press" onto canonical ids like "bench_press"
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Canonical exercise identifier
///
/// Identifiers are lowercase ASCII words joined by single underscores, so
/// `"Bench Press"`, `"bench-press"` and `"BENCH_PRESS"` all name the same
/// exercise.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ExerciseId(String);

impl ExerciseId {
    /// Normalize a raw exercise name into an identifier
    #[must_use]
    pub fn new(raw: &str) -> Self {
        let mut normalized = String::with_capacity(raw.len());
        let mut pending_separator = false;

        for ch in raw.trim().chars() {
            if ch.is_ascii_alphanumeric() {
                if pending_separator && !normalized.is_empty() {
                    normalized.push('_');
                }
                pending_separator = false;
                normalized.push(ch.to_ascii_lowercase());
            } else {
                pending_separator = true;
            }
        }

        Self(normalized)
    }

    /// Identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether normalization left nothing behind
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ExerciseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ExerciseId {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

impl From<&str> for ExerciseId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<ExerciseId> for String {
    fn from(id: ExerciseId) -> Self {
        id.0
    }
}

impl FromStr for ExerciseId {
    type Err = Infallible;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(raw))
    }
}
