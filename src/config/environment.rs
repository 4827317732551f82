// ABOUTME: Environment-based pipeline configuration with defaults in code
// ABOUTME: Queue capacities, extractor timeout and retry budget, rubric fallback, storage paths
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use formiq_core::constants::env_config;
use formiq_intelligence::config::{ConfigError, IntelligenceConfig};
use formiq_intelligence::rubric::{FallbackPolicy, RubricCatalog, RubricError};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

/// Guard applied around every pose extractor call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorConfig {
    /// Longest wait for one frame batch
    pub batch_timeout: Duration,
    /// Consecutive timeouts or transient failures tolerated before stalling
    pub max_retries: u32,
    /// Pause between retries
    pub retry_backoff: Duration,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            batch_timeout: Duration::from_millis(2_000),
            max_retries: 3,
            retry_backoff: Duration::from_millis(100),
        }
    }
}

/// Settings for one analysis pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Segmenter, scorer and aggregator thresholds
    pub intelligence: IntelligenceConfig,
    /// Frame batches buffered between extraction and segmentation
    pub frame_queue_capacity: usize,
    /// Repetitions buffered between segmentation and scoring
    pub rep_queue_capacity: usize,
    /// Extractor timeout and retry budget
    pub extractor: ExtractorConfig,
    /// Behaviour for exercises without a dedicated rubric
    pub rubric_fallback: FallbackPolicy,
    /// JSON rubric catalog replacing the built-in one
    pub rubric_path: Option<PathBuf>,
    /// Directory of the JSON history store
    pub history_dir: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            intelligence: IntelligenceConfig::default(),
            frame_queue_capacity: 8,
            rep_queue_capacity: 16,
            extractor: ExtractorConfig::default(),
            rubric_fallback: FallbackPolicy::Reject,
            rubric_path: None,
            history_dir: None,
        }
    }
}

impl PipelineConfig {
    /// Load configuration from defaults and environment overrides
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable cannot be parsed or the
    /// resulting configuration fails validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self {
            intelligence: IntelligenceConfig::from_env()?,
            ..Self::default()
        };

        apply_env_var(
            env_config::FRAME_QUEUE_CAPACITY,
            &mut config.frame_queue_capacity,
        )?;
        apply_env_var(env_config::REP_QUEUE_CAPACITY, &mut config.rep_queue_capacity)?;
        apply_env_var(
            env_config::EXTRACTOR_MAX_RETRIES,
            &mut config.extractor.max_retries,
        )?;
        apply_env_millis(
            env_config::EXTRACTOR_TIMEOUT_MS,
            &mut config.extractor.batch_timeout,
        )?;
        apply_env_millis(
            env_config::EXTRACTOR_RETRY_BACKOFF_MS,
            &mut config.extractor.retry_backoff,
        )?;

        if let Ok(policy) = env::var(env_config::RUBRIC_FALLBACK) {
            config.rubric_fallback = policy.parse().map_err(ConfigError::Parse)?;
        }
        config.rubric_path = env_path(env_config::RUBRIC_PATH);
        config.history_dir = env_path(env_config::HISTORY_DIR);

        config.validate()?;
        debug!(?config, "Loaded pipeline configuration");
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a queue has no capacity, the extractor timeout is
    /// zero, or the intelligence configuration is invalid
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.intelligence.validate()?;

        if self.frame_queue_capacity == 0 {
            return Err(ConfigError::ValueOutOfRange(
                "frame_queue_capacity must be at least 1",
            ));
        }
        if self.rep_queue_capacity == 0 {
            return Err(ConfigError::ValueOutOfRange(
                "rep_queue_capacity must be at least 1",
            ));
        }
        if self.extractor.batch_timeout.is_zero() {
            return Err(ConfigError::ValueOutOfRange(
                "extractor batch_timeout must be greater than zero",
            ));
        }

        Ok(())
    }

    /// Load the rubric catalog named by `rubric_path`, or the built-in one
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be read or fails validation
    pub fn load_catalog(&self) -> Result<RubricCatalog, RubricError> {
        let catalog = match &self.rubric_path {
            Some(path) => RubricCatalog::from_json_file(path)?,
            None => RubricCatalog::builtin()?,
        };
        info!(
            exercises = catalog.len(),
            source = %self.rubric_path.as_ref().map_or_else(|| "builtin".into(), |path| path.display().to_string()),
            "Rubric catalog loaded"
        );
        Ok(catalog)
    }
}

/// Parse an environment variable into `target` when it is set
fn apply_env_var<T: FromStr>(env_var_name: &str, target: &mut T) -> Result<(), ConfigError> {
    if let Ok(val) = env::var(env_var_name) {
        *target = val
            .trim()
            .parse()
            .map_err(|_| ConfigError::Parse(format!("Invalid {env_var_name}: '{val}'")))?;
    }
    Ok(())
}

/// Millisecond variant of [`apply_env_var`]
fn apply_env_millis(env_var_name: &str, target: &mut Duration) -> Result<(), ConfigError> {
    let mut millis = u64::try_from(target.as_millis()).unwrap_or(u64::MAX);
    apply_env_var(env_var_name, &mut millis)?;
    *target = Duration::from_millis(millis);
    Ok(())
}

fn env_path(env_var_name: &str) -> Option<PathBuf> {
    env::var(env_var_name)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}
