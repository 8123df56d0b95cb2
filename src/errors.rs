// Copyright 2026 Gleaner Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error taxonomy for the harvest pipeline.
//!
//! Per-item and per-page failures are contained where they occur and never
//! propagate past the pagination loop. Only configuration errors (before any
//! navigation) and the final export are allowed to terminate a run.

use std::path::PathBuf;
use thiserror::Error;

/// Invalid run parameters. Surfaced to the operator before any navigation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The page-count prompt received non-numeric input. Never coerced to a
    /// default.
    #[error("page count must be an integer, got `{0}`")]
    InvalidPageCount(String),

    /// The destination prompt received an empty file name.
    #[error("destination file name must not be empty")]
    MissingDestination,
}

/// Browser-level failures at the driver boundary.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("failed to launch browser: {0}")]
    Launch(String),

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("navigation to {url} timed out after {timeout_ms}ms")]
    NavigationTimeout { url: String, timeout_ms: u64 },

    /// The element-presence wait expired. The affected page degrades to an
    /// empty batch.
    #[error("no element matching `{selector}` appeared within {timeout_ms}ms")]
    WaitTimeout { selector: String, timeout_ms: u64 },

    /// An element handle no longer resolves in the session that issued it.
    #[error("stale element handle {0}")]
    StaleHandle(u64),

    #[error("browser session error: {0}")]
    Session(String),
}

/// A single item could not be extracted. The item is dropped and logged; the
/// rest of the page is unaffected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    /// A mandatory field (`title` or `url`) resolved to nothing. Partial
    /// records are never emitted.
    #[error("item {index}: mandatory field `{field}` did not resolve")]
    MissingMandatoryField { field: &'static str, index: usize },
}

/// The destination artifact could not be produced. Fatal: by the time export
/// runs, all extraction work is already complete.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to encode records")]
    Encode(#[from] csv::Error),

    #[error("failed to write `{path}`")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_messages() {
        let e = ConfigError::InvalidPageCount("three".to_string());
        assert_eq!(e.to_string(), "page count must be an integer, got `three`");
        assert_eq!(
            ConfigError::MissingDestination.to_string(),
            "destination file name must not be empty"
        );
    }

    #[test]
    fn test_extract_error_names_field_and_index() {
        let e = ExtractError::MissingMandatoryField {
            field: "title",
            index: 4,
        };
        let msg = e.to_string();
        assert!(msg.contains("title"));
        assert!(msg.contains('4'));
    }

    #[test]
    fn test_wait_timeout_message() {
        let e = DriverError::WaitTimeout {
            selector: "#questions".to_string(),
            timeout_ms: 10_000,
        };
        assert!(e.to_string().contains("#questions"));
        assert!(e.to_string().contains("10000ms"));
    }
}
