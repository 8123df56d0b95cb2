// Copyright 2026 Gleaner Contributors
// SPDX-License-Identifier: Apache-2.0

//! Gleaner library — paginated listing harvester.
//!
//! This library crate exposes the core modules for integration testing.

#![allow(clippy::new_without_default)]

#[cfg(feature = "redis-cache")]
pub mod cache;
pub mod cli;
pub mod driver;
pub mod errors;
pub mod export;
pub mod extract;
pub mod harvest;
pub mod input;
pub mod paginate;
pub mod progress;
pub mod schema;
