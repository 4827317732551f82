// ABOUTME: Configuration and rubric catalog loading shared by formiq-cli commands
// ABOUTME: Applies command-line overrides on top of the environment configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use anyhow::Result;
use formiq::config::PipelineConfig;
use formiq::rubric::RubricCatalog;
use std::path::PathBuf;

/// Environment configuration with an optional rubric catalog override
pub fn load_config(rubrics: Option<PathBuf>) -> Result<PipelineConfig> {
    let mut config = PipelineConfig::from_env()?;
    if rubrics.is_some() {
        config.rubric_path = rubrics;
    }
    Ok(config)
}

/// Catalog named by the configuration
pub fn load_catalog(config: &PipelineConfig) -> Result<RubricCatalog> {
    Ok(config.load_catalog()?)
}
