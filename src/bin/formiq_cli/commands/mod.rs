// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
// ABOUTME: Re-exports command modules for formiq-cli
// ABOUTME: Provides access to analyze, rubric listing, and history commands

pub mod analyze;
pub mod history;
pub mod rubrics;
