// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
// ABOUTME: Re-exports helper modules for formiq-cli
// ABOUTME: Provides catalog loading and display formatting utilities

pub mod catalog;
pub mod display;
