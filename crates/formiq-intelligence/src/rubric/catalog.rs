// ABOUTME: Validated rubric catalog keyed by normalized exercise identifier
// ABOUTME: Loads built-in or JSON profiles, validates them up front, and resolves aliases
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::builtin;
use super::profile::{ExerciseProfile, MotionThresholds};
use super::rule::RubricRule;
use formiq_core::constants::exercises;
use formiq_core::errors::{AnalysisError, AnalysisResult};
use formiq_core::models::ExerciseId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::fs;
use std::iter;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info};

/// Catalog validation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RubricError {
    /// A profile or rule failed validation
    #[error("invalid rubric for '{exercise}': {reason}")]
    Invalid {
        /// Exercise whose profile is invalid
        exercise: String,
        /// What is wrong
        reason: String,
    },

    /// Two profiles claim the same identifier or alias
    #[error("exercise '{0}' is defined more than once")]
    Duplicate(String),

    /// Catalog document could not be read or parsed
    #[error("failed to load rubric catalog: {0}")]
    Load(String),
}

impl RubricError {
    fn invalid(exercise: &ExerciseId, reason: impl Into<String>) -> Self {
        Self::Invalid {
            exercise: exercise.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<RubricError> for AnalysisError {
    fn from(error: RubricError) -> Self {
        match error {
            RubricError::Invalid { exercise, reason } => Self::invalid_rubric(exercise, reason),
            RubricError::Duplicate(exercise) => {
                Self::invalid_rubric(exercise, "defined more than once")
            }
            RubricError::Load(reason) => Self::invalid_rubric("catalog", reason),
        }
    }
}

/// What to do when an exercise has no dedicated rubric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Fail with `UnknownExercise`
    #[default]
    Reject,
    /// Score with the generic rubric
    Generic,
}

impl FromStr for FallbackPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reject" | "strict" => Ok(Self::Reject),
            "generic" | "fallback" => Ok(Self::Generic),
            other => Err(format!("unknown rubric fallback policy '{other}'")),
        }
    }
}

impl fmt::Display for FallbackPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reject => f.write_str("reject"),
            Self::Generic => f.write_str("generic"),
        }
    }
}

/// Serialized catalog document
#[derive(Debug, Serialize, Deserialize)]
struct CatalogDocument {
    exercises: Vec<ExerciseProfile>,
}

/// Validated collection of exercise profiles
#[derive(Debug, Clone, Default)]
pub struct RubricCatalog {
    profiles: BTreeMap<ExerciseId, ExerciseProfile>,
    aliases: BTreeMap<ExerciseId, ExerciseId>,
}

impl RubricCatalog {
    /// Catalog of the built-in exercises plus the generic rubric
    ///
    /// # Errors
    ///
    /// Returns an error if a built-in profile fails validation
    pub fn builtin() -> Result<Self, RubricError> {
        Self::from_profiles(builtin::profiles())
    }

    /// Build a catalog, validating every profile
    ///
    /// # Errors
    ///
    /// Returns the first validation failure or duplicate identifier
    pub fn from_profiles(profiles: Vec<ExerciseProfile>) -> Result<Self, RubricError> {
        let mut catalog = Self::default();
        for profile in profiles {
            catalog.insert(profile)?;
        }
        info!(exercises = catalog.len(), "Rubric catalog loaded");
        Ok(catalog)
    }

    /// Parse a JSON catalog document (`{"exercises": [...]}`)
    ///
    /// # Errors
    ///
    /// Returns an error when the document is malformed or a profile is invalid
    pub fn from_json_str(json: &str) -> Result<Self, RubricError> {
        let document: CatalogDocument =
            serde_json::from_str(json).map_err(|e| RubricError::Load(e.to_string()))?;
        Self::from_profiles(document.exercises)
    }

    /// Load a JSON catalog document from disk
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or the document is invalid
    pub fn from_json_file(path: &Path) -> Result<Self, RubricError> {
        let json = fs::read_to_string(path)
            .map_err(|e| RubricError::Load(format!("{}: {e}", path.display())))?;
        debug!(path = %path.display(), "Loading rubric catalog");
        Self::from_json_str(&json)
    }

    /// Serialize the catalog as a JSON document
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails
    pub fn to_json_string(&self) -> Result<String, RubricError> {
        let document = CatalogDocument {
            exercises: self.profiles.values().cloned().collect(),
        };
        serde_json::to_string_pretty(&document).map_err(|e| RubricError::Load(e.to_string()))
    }

    /// Add a profile after validating it
    ///
    /// # Errors
    ///
    /// Returns an error if the profile is invalid or an identifier is taken
    pub fn insert(&mut self, profile: ExerciseProfile) -> Result<(), RubricError> {
        validate_profile(&profile)?;

        for name in iter::once(&profile.id).chain(&profile.aliases) {
            if self.profiles.contains_key(name) || self.aliases.contains_key(name) {
                return Err(RubricError::Duplicate(name.to_string()));
            }
        }
        for alias in &profile.aliases {
            self.aliases.insert(alias.clone(), profile.id.clone());
        }
        self.profiles.insert(profile.id.clone(), profile);
        Ok(())
    }

    /// Profile for an exercise or one of its aliases
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::UnknownExercise` when no profile matches
    pub fn get(&self, exercise: &ExerciseId) -> AnalysisResult<&ExerciseProfile> {
        let canonical = self.aliases.get(exercise).unwrap_or(exercise);
        self.profiles
            .get(canonical)
            .ok_or_else(|| AnalysisError::unknown_exercise(exercise.as_str()))
    }

    /// Profile for an exercise, applying the fallback policy on a miss
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::UnknownExercise` when no profile matches and the
    /// policy is `Reject` or the catalog has no generic rubric
    pub fn resolve(
        &self,
        exercise: &ExerciseId,
        policy: FallbackPolicy,
    ) -> AnalysisResult<&ExerciseProfile> {
        match (self.get(exercise), policy) {
            (Ok(profile), _) => Ok(profile),
            (Err(error), FallbackPolicy::Reject) => Err(error),
            (Err(error), FallbackPolicy::Generic) => {
                let generic = ExerciseId::new(exercises::GENERIC);
                let profile = self.profiles.get(&generic).ok_or(error)?;
                info!(exercise = %exercise, "No dedicated rubric, using generic rubric");
                Ok(profile)
            }
        }
    }

    /// Whether a name resolves to a profile
    #[must_use]
    pub fn contains(&self, exercise: &ExerciseId) -> bool {
        self.get(exercise).is_ok()
    }

    /// All profiles, ordered by identifier
    pub fn profiles(&self) -> impl Iterator<Item = &ExerciseProfile> {
        self.profiles.values()
    }

    /// Number of profiles
    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Whether the catalog has no profiles
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

fn validate_profile(profile: &ExerciseProfile) -> Result<(), RubricError> {
    let id = &profile.id;
    if id.is_empty() {
        return Err(RubricError::invalid(id, "exercise identifier is empty"));
    }
    if profile.motion.tracking_joints.is_empty() {
        return Err(RubricError::invalid(id, "motion profile has no tracking joints"));
    }
    validate_thresholds(id, &profile.motion.thresholds)?;

    if profile.rubric.rules.is_empty() {
        return Err(RubricError::invalid(id, "rubric has no rules"));
    }
    let mut seen = HashSet::new();
    for rule in &profile.rubric.rules {
        if !seen.insert(rule.id.as_str()) {
            return Err(RubricError::invalid(
                id,
                format!("rule '{}' is defined more than once", rule.id),
            ));
        }
        validate_rule(id, rule)?;
    }
    Ok(())
}

fn validate_thresholds(id: &ExerciseId, thresholds: &MotionThresholds) -> Result<(), RubricError> {
    let values = [
        thresholds.start_displacement,
        thresholds.min_displacement,
        thresholds.top_tolerance,
        thresholds.min_velocity,
    ];
    if values.iter().any(|value| !value.is_finite() || *value < 0.0) {
        return Err(RubricError::invalid(
            id,
            "motion thresholds must be finite and non-negative",
        ));
    }
    if thresholds.top_tolerance >= thresholds.start_displacement {
        return Err(RubricError::invalid(
            id,
            "top_tolerance must be < start_displacement",
        ));
    }
    if thresholds.start_displacement >= thresholds.min_displacement {
        return Err(RubricError::invalid(
            id,
            "start_displacement must be < min_displacement",
        ));
    }
    if thresholds.debounce_frames == 0 {
        return Err(RubricError::invalid(id, "debounce_frames must be at least 1"));
    }
    Ok(())
}

fn validate_rule(id: &ExerciseId, rule: &RubricRule) -> Result<(), RubricError> {
    if rule.id.trim().is_empty() || rule.title.trim().is_empty() {
        return Err(RubricError::invalid(id, "rule id and title must not be empty"));
    }
    if rule.tip.trim().is_empty() {
        return Err(RubricError::invalid(
            id,
            format!("rule '{}' has no coaching tip", rule.id),
        ));
    }
    let target = rule.target;
    if !target.min.is_finite() || !target.max.is_finite() || target.min > target.max {
        return Err(RubricError::invalid(
            id,
            format!(
                "rule '{}' target range [{}, {}] is invalid",
                rule.id, target.min, target.max
            ),
        ));
    }
    if rule
        .penalty
        .parameters()
        .iter()
        .any(|value| !value.is_finite() || *value < 0.0)
    {
        return Err(RubricError::invalid(
            id,
            format!("rule '{}' penalty parameters must be finite and non-negative", rule.id),
        ));
    }
    Ok(())
}
