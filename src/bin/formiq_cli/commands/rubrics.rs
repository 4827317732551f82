// ABOUTME: Rubric listing command for formiq-cli
// ABOUTME: Prints supported exercises, one rubric in detail, or the whole catalog as JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use anyhow::Result;
use formiq::models::ExerciseId;
use std::path::PathBuf;

use crate::helpers::catalog::{load_catalog, load_config};
use crate::helpers::display::{display_catalog, display_profile};

/// List the catalog, or show one exercise
pub fn run(rubrics: Option<PathBuf>, exercise: Option<&str>, json: bool) -> Result<()> {
    let config = load_config(rubrics)?;
    let catalog = load_catalog(&config)?;

    match exercise {
        Some(name) => {
            let profile = catalog.get(&ExerciseId::new(name))?;
            if json {
                println!("{}", serde_json::to_string_pretty(profile)?);
            } else {
                display_profile(profile);
            }
        }
        None if json => println!("{}", catalog.to_json_string()?),
        None => display_catalog(&catalog),
    }

    Ok(())
}
