// ABOUTME: History store error types for session summary persistence
// ABOUTME: Covers I/O, serialization, and invalid key failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::io;
use thiserror::Error;

/// Errors raised by session history stores
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HistoryError {
    /// Underlying storage could not be read or written
    #[error("storage I/O failed: {0}")]
    Io(String),

    /// A stored record could not be encoded or decoded
    #[error("record serialization failed: {0}")]
    Serialization(String),

    /// Key component contains characters the store cannot represent
    #[error("invalid history key: {0}")]
    InvalidKey(String),
}

impl From<io::Error> for HistoryError {
    fn from(error: io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

impl From<serde_json::Error> for HistoryError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}
