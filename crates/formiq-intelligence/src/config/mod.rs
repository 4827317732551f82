// ABOUTME: Configuration module for formiq-intelligence crate
// ABOUTME: Re-exports intelligence configuration types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Intelligence module configuration (segmentation, scoring, aggregation)
pub mod intelligence;

pub use intelligence::{
    AggregationConfig, ConfigError, IntelligenceConfig, ScoringConfig, SegmentationConfig,
};
