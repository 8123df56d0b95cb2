// Copyright 2026 Gleaner Contributors
// SPDX-License-Identifier: Apache-2.0

//! Browser driver abstraction for page navigation and element reads.
//!
//! Defines the `Driver` and `DriverSession` traits that abstract over the
//! browser engine (currently Chromium via chromiumoxide). The pipeline only
//! ever performs read-only DOM queries through this boundary.

pub mod chromium;

use crate::errors::DriverError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// An opaque reference to one DOM element. Only meaningful to the session
/// that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementHandle(pub u64);

impl std::fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "el#{}", self.0)
    }
}

/// A browser engine that can open sessions (tabs).
#[async_trait]
pub trait Driver: Send + Sync {
    /// Open a new browser session (tab).
    async fn new_session(&self) -> Result<Box<dyn DriverSession>, DriverError>;
    /// Shut down the browser engine.
    async fn shutdown(&self) -> Result<(), DriverError>;
    /// Number of currently open sessions.
    fn active_sessions(&self) -> usize;
}

/// A single browser session. One run owns exactly one session for its whole
/// lifetime and must close it exactly once on every exit path.
#[async_trait]
pub trait DriverSession: Send + Sync {
    /// Navigate to a URL with a timeout.
    async fn navigate(&self, url: &str, timeout_ms: u64) -> Result<(), DriverError>;

    /// Wait, with a bounded timeout, for an element matching `selector` to
    /// become present in the document.
    async fn wait_for_element(
        &self,
        selector: &str,
        timeout_ms: u64,
    ) -> Result<ElementHandle, DriverError>;

    /// Find the first element matching `selector`, scoped to `scope` when
    /// given, otherwise to the document. `Ok(None)` when nothing matches.
    async fn find_element(
        &self,
        scope: Option<&ElementHandle>,
        selector: &str,
    ) -> Result<Option<ElementHandle>, DriverError>;

    /// Find all elements matching `selector` in document order, scoped to
    /// `scope` when given, otherwise to the document.
    async fn find_all_elements(
        &self,
        scope: Option<&ElementHandle>,
        selector: &str,
    ) -> Result<Vec<ElementHandle>, DriverError>;

    /// Visible text of an element.
    async fn text(&self, handle: &ElementHandle) -> Result<String, DriverError>;

    /// A named attribute of an element. `Ok(None)` when the attribute is
    /// absent.
    async fn attribute(
        &self,
        handle: &ElementHandle,
        name: &str,
    ) -> Result<Option<String>, DriverError>;

    /// Close this session.
    async fn close(self: Box<Self>) -> Result<(), DriverError>;
}
