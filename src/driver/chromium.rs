// Copyright 2026 Gleaner Contributors
// SPDX-License-Identifier: Apache-2.0

//! Chromium-based driver using chromiumoxide.

use super::{Driver, DriverSession, ElementHandle};
use crate::errors::DriverError;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use dashmap::DashMap;
use futures::StreamExt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Interval between element-presence polls.
const WAIT_POLL_MS: u64 = 250;

/// Find the Chromium binary path.
pub fn find_chromium() -> Option<PathBuf> {
    // 1. GLEANER_CHROMIUM_PATH env
    if let Ok(p) = std::env::var("GLEANER_CHROMIUM_PATH") {
        let path = PathBuf::from(&p);
        if path.exists() {
            return Some(path);
        }
    }

    // 2. ~/.gleaner/chromium/
    if let Some(home) = dirs::home_dir() {
        let candidates = if cfg!(target_os = "macos") {
            vec![
                home.join(".gleaner/chromium/chrome-mac-arm64/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing"),
                home.join(".gleaner/chromium/chrome-mac-x64/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing"),
                home.join(".gleaner/chromium/chrome"),
            ]
        } else {
            vec![
                home.join(".gleaner/chromium/chrome-linux64/chrome"),
                home.join(".gleaner/chromium/chrome"),
            ]
        };
        for c in candidates {
            if c.exists() {
                return Some(c);
            }
        }
    }

    // 3. System PATH
    if let Ok(path) = which::which("google-chrome") {
        return Some(path);
    }
    if let Ok(path) = which::which("chromium") {
        return Some(path);
    }
    if let Ok(path) = which::which("chromium-browser") {
        return Some(path);
    }

    // 4. Common macOS locations
    if cfg!(target_os = "macos") {
        let common =
            PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome");
        if common.exists() {
            return Some(common);
        }
    }

    None
}

/// Chromium-based driver.
pub struct ChromiumDriver {
    browser: Browser,
    active_count: Arc<AtomicUsize>,
}

impl ChromiumDriver {
    /// Create a new ChromiumDriver, launching a headless Chromium instance.
    pub async fn new() -> Result<Self, DriverError> {
        let chrome_path = find_chromium().ok_or_else(|| {
            DriverError::Launch(
                "Chromium not found. Install Chrome or set GLEANER_CHROMIUM_PATH.".to_string(),
            )
        })?;

        let config = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-background-networking")
            .build()
            .map_err(|e| DriverError::Launch(format!("failed to build browser config: {e}")))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| DriverError::Launch(format!("failed to launch Chromium: {e}")))?;

        // Spawn the handler task
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        Ok(Self {
            browser,
            active_count: Arc::new(AtomicUsize::new(0)),
        })
    }
}

#[async_trait]
impl Driver for ChromiumDriver {
    async fn new_session(&self) -> Result<Box<dyn DriverSession>, DriverError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| DriverError::Session(format!("failed to create new page: {e}")))?;

        self.active_count.fetch_add(1, Ordering::Relaxed);

        Ok(Box::new(ChromiumSession {
            page,
            elements: DashMap::new(),
            next_id: AtomicU64::new(1),
            active_count: Arc::clone(&self.active_count),
        }))
    }

    async fn shutdown(&self) -> Result<(), DriverError> {
        // Browser is dropped when ChromiumDriver is dropped
        Ok(())
    }

    fn active_sessions(&self) -> usize {
        self.active_count.load(Ordering::Relaxed)
    }
}

/// A single Chromium page session.
///
/// Element handles are ids into a session-local registry; the registry is
/// cleared on every navigation since node references do not survive a page
/// load.
pub struct ChromiumSession {
    page: Page,
    elements: DashMap<u64, Arc<Element>>,
    next_id: AtomicU64,
    active_count: Arc<AtomicUsize>,
}

impl ChromiumSession {
    fn register(&self, element: Element) -> ElementHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.elements.insert(id, Arc::new(element));
        ElementHandle(id)
    }

    /// Clone the element out of the registry so no map guard is held across
    /// an await point.
    fn resolve(&self, handle: &ElementHandle) -> Result<Arc<Element>, DriverError> {
        self.elements
            .get(&handle.0)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(DriverError::StaleHandle(handle.0))
    }
}

#[async_trait]
impl DriverSession for ChromiumSession {
    async fn navigate(&self, url: &str, timeout_ms: u64) -> Result<(), DriverError> {
        self.elements.clear();

        let result = tokio::time::timeout(
            Duration::from_millis(timeout_ms),
            self.page.goto(url),
        )
        .await;

        match result {
            Ok(Ok(_page)) => {
                // Wait for the load to settle
                let _ = self.page.wait_for_navigation().await;
                Ok(())
            }
            Ok(Err(e)) => Err(DriverError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            }),
            Err(_) => Err(DriverError::NavigationTimeout {
                url: url.to_string(),
                timeout_ms,
            }),
        }
    }

    async fn wait_for_element(
        &self,
        selector: &str,
        timeout_ms: u64,
    ) -> Result<ElementHandle, DriverError> {
        let deadline = Instant::now() + Duration::from_millis(timeout_ms);
        loop {
            if let Some(handle) = self.find_element(None, selector).await? {
                return Ok(handle);
            }
            if Instant::now() >= deadline {
                return Err(DriverError::WaitTimeout {
                    selector: selector.to_string(),
                    timeout_ms,
                });
            }
            tokio::time::sleep(Duration::from_millis(WAIT_POLL_MS)).await;
        }
    }

    async fn find_element(
        &self,
        scope: Option<&ElementHandle>,
        selector: &str,
    ) -> Result<Option<ElementHandle>, DriverError> {
        // chromiumoxide reports "no match" as an error; treat any resolution
        // failure as absence so callers can apply their own fallback policy.
        let found = match scope {
            Some(handle) => {
                let parent = self.resolve(handle)?;
                parent.find_element(selector).await.ok()
            }
            None => self.page.find_element(selector).await.ok(),
        };
        Ok(found.map(|el| self.register(el)))
    }

    async fn find_all_elements(
        &self,
        scope: Option<&ElementHandle>,
        selector: &str,
    ) -> Result<Vec<ElementHandle>, DriverError> {
        let found = match scope {
            Some(handle) => {
                let parent = self.resolve(handle)?;
                parent.find_elements(selector).await.unwrap_or_default()
            }
            None => self.page.find_elements(selector).await.unwrap_or_default(),
        };
        Ok(found.into_iter().map(|el| self.register(el)).collect())
    }

    async fn text(&self, handle: &ElementHandle) -> Result<String, DriverError> {
        let element = self.resolve(handle)?;
        let text = element
            .inner_text()
            .await
            .map_err(|e| DriverError::Session(format!("failed to read text: {e}")))?;
        Ok(text.unwrap_or_default())
    }

    async fn attribute(
        &self,
        handle: &ElementHandle,
        name: &str,
    ) -> Result<Option<String>, DriverError> {
        let element = self.resolve(handle)?;
        element
            .attribute(name)
            .await
            .map_err(|e| DriverError::Session(format!("failed to read attribute {name}: {e}")))
    }

    async fn close(self: Box<Self>) -> Result<(), DriverError> {
        self.active_count.fetch_sub(1, Ordering::Relaxed);
        let _ = self.page.close().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires Chromium to be installed
    async fn test_chromium_navigate_and_read_elements() {
        let driver = ChromiumDriver::new().await.expect("failed to create driver");
        let session = driver
            .new_session()
            .await
            .expect("failed to create session");

        session
            .navigate(
                "data:text/html,<div id=\"list\"><p class=\"item\"><a href=\"/a\">Hello</a></p></div>",
                10_000,
            )
            .await
            .expect("navigation failed");

        let list = session
            .wait_for_element("#list", 5_000)
            .await
            .expect("list did not appear");

        let items = session
            .find_all_elements(Some(&list), ".item")
            .await
            .expect("find_all failed");
        assert_eq!(items.len(), 1);

        let anchor = session
            .find_element(Some(&items[0]), "a")
            .await
            .expect("find failed")
            .expect("anchor missing");

        assert_eq!(session.text(&anchor).await.unwrap(), "Hello");
        let href = session.attribute(&anchor, "href").await.unwrap();
        assert!(href.is_some());

        let missing = session
            .find_element(Some(&items[0]), ".does-not-exist")
            .await
            .unwrap();
        assert!(missing.is_none());

        session.close().await.expect("close failed");
        assert_eq!(driver.active_sessions(), 0);

        driver.shutdown().await.expect("shutdown failed");
    }
}
