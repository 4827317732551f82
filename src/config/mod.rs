// ABOUTME: Configuration management module for the analysis pipeline
// ABOUTME: Re-exports environment-driven pipeline settings and the intelligence configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module
//!
//! Configuration is environment-only with defaults in code:
//!
//! - **Environment**: queue capacities, extractor guard, rubric and history locations
//! - **Intelligence**: segmenter, scorer and aggregator thresholds (from `formiq-intelligence`)

/// Pipeline configuration loaded from environment variables
pub mod environment;

pub use environment::{ExtractorConfig, PipelineConfig};
pub use formiq_intelligence::config::{ConfigError, IntelligenceConfig};
