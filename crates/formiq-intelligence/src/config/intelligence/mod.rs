// ABOUTME: Intelligence configuration for the form-analysis engine
// ABOUTME: Orchestrates domain-specific configs and provides unified validation and loading
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Intelligence Configuration Module
//!
//! Configuration is organized into domain-specific modules:
//! - `segmentation` - tracking confidence, frame gap tolerance, trailing-rep policy
//! - `scoring` - sample confidence, deviation visibility, severity buckets
//! - `aggregation` - recurring deviation count
//!
//! Defaults are tuned for 30 fps capture. Every value can be overridden with a
//! `FORMIQ_*` environment variable; overrides are validated before use.

pub mod aggregation;
pub mod error;
pub mod scoring;
pub mod segmentation;

pub use aggregation::AggregationConfig;
pub use error::ConfigError;
pub use scoring::ScoringConfig;
pub use segmentation::SegmentationConfig;

use formiq_core::constants::env_config;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use tracing::debug;

/// Main intelligence configuration container
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntelligenceConfig {
    /// Rep segmenter limits
    pub segmentation: SegmentationConfig,
    /// Form scorer thresholds
    pub scoring: ScoringConfig,
    /// Session aggregator settings
    pub aggregation: AggregationConfig,
}

impl IntelligenceConfig {
    /// Load configuration from defaults and environment overrides
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values or validation fails
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self::default().apply_env_overrides()?;
        config.validate()?;
        debug!(?config, "Loaded intelligence configuration");
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid value
    pub fn validate(&self) -> Result<(), ConfigError> {
        let segmentation = &self.segmentation;
        if !(0.0..=1.0).contains(&segmentation.min_tracking_confidence) {
            return Err(ConfigError::ValueOutOfRange(
                "min_tracking_confidence must be within [0, 1]",
            ));
        }
        if segmentation.max_frame_gap_ms == 0 {
            return Err(ConfigError::ValueOutOfRange(
                "max_frame_gap_ms must be positive",
            ));
        }
        if !(segmentation.near_complete_ratio > 0.0 && segmentation.near_complete_ratio <= 1.0) {
            return Err(ConfigError::ValueOutOfRange(
                "near_complete_ratio must be within (0, 1]",
            ));
        }

        let scoring = &self.scoring;
        if !(0.0..=1.0).contains(&scoring.min_sample_confidence) {
            return Err(ConfigError::ValueOutOfRange(
                "min_sample_confidence must be within [0, 1]",
            ));
        }
        if !scoring.visibility_threshold.is_finite() || scoring.visibility_threshold < 0.0 {
            return Err(ConfigError::ValueOutOfRange(
                "visibility_threshold must be a non-negative number",
            ));
        }
        if !(scoring.medium_severity_penalty > 0.0
            && scoring.medium_severity_penalty < scoring.high_severity_penalty)
        {
            return Err(ConfigError::InvalidRange(
                "medium_severity_penalty must be positive and < high_severity_penalty",
            ));
        }

        if self.aggregation.top_deviations == 0 {
            return Err(ConfigError::ValueOutOfRange(
                "top_deviations must be at least 1",
            ));
        }

        Ok(())
    }

    /// Helper function to parse and apply an environment variable override
    fn apply_env_var<T: FromStr>(env_var_name: &str, target: &mut T) -> Result<(), ConfigError> {
        if let Ok(val) = env::var(env_var_name) {
            *target = val
                .trim()
                .parse()
                .map_err(|_| ConfigError::Parse(format!("Invalid {env_var_name}: '{val}'")))?;
        }
        Ok(())
    }

    fn apply_env_overrides(mut self) -> Result<Self, ConfigError> {
        Self::apply_env_var(
            env_config::MIN_TRACKING_CONFIDENCE,
            &mut self.segmentation.min_tracking_confidence,
        )?;
        Self::apply_env_var(
            env_config::MAX_LOW_CONFIDENCE_FRAMES,
            &mut self.segmentation.max_low_confidence_frames,
        )?;
        Self::apply_env_var(
            env_config::MAX_FRAME_GAP_MS,
            &mut self.segmentation.max_frame_gap_ms,
        )?;
        Self::apply_env_var(
            env_config::NEAR_COMPLETE_RATIO,
            &mut self.segmentation.near_complete_ratio,
        )?;

        Self::apply_env_var(
            env_config::MIN_SAMPLE_CONFIDENCE,
            &mut self.scoring.min_sample_confidence,
        )?;
        Self::apply_env_var(
            env_config::VISIBILITY_THRESHOLD,
            &mut self.scoring.visibility_threshold,
        )?;

        Self::apply_env_var(
            env_config::TOP_DEVIATIONS,
            &mut self.aggregation.top_deviations,
        )?;

        Ok(self)
    }
}
