// Copyright 2026 Gleaner Contributors
// SPDX-License-Identifier: Apache-2.0

//! Pagination Controller: drive one browser session across the page range
//! and fold every page batch into the run accumulator.
//!
//! Pages are visited strictly sequentially (one session, one tab) and every
//! per-page failure is contained here: a page that fails to load becomes an
//! empty batch and the run continues, because partial results remain
//! valuable. The session is released exactly once on every exit path.

use crate::driver::{Driver, DriverSession};
use crate::errors::DriverError;
use crate::harvest;
use crate::progress::{emit, ProgressSender, ScrapeEventKind};
use crate::schema::Question;
use std::time::Instant;
use tracing::{info, warn};
use url::Url;
use uuid::Uuid;

const DEFAULT_NAV_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_WAIT_TIMEOUT_MS: u64 = 10_000;

/// Parameters for one scrape run.
#[derive(Debug, Clone)]
pub struct ScrapeRequest {
    pub run_id: String,
    /// Listing URL without pagination parameters.
    pub base_url: String,
    /// Number of pages to visit. Values ≤ 0 visit no pages at all.
    pub page_count: i64,
    pub nav_timeout_ms: u64,
    pub wait_timeout_ms: u64,
}

impl ScrapeRequest {
    pub fn new(base_url: impl Into<String>, page_count: i64) -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            base_url: base_url.into(),
            page_count,
            nav_timeout_ms: DEFAULT_NAV_TIMEOUT_MS,
            wait_timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
        }
    }
}

/// Build the URL for one listing page: `base_url` plus the fixed
/// `tab=newest&page=<n>` query parameters.
pub fn page_url(base_url: &str, page: i64) -> Result<String, url::ParseError> {
    let mut url = Url::parse(base_url)?;
    url.query_pairs_mut()
        .append_pair("tab", "newest")
        .append_pair("page", &page.to_string());
    Ok(url.to_string())
}

/// Run the whole pipeline: acquire one session, visit pages `1..=page_count`,
/// harvest each, and return the accumulated records in visitation order.
///
/// Only session acquisition can fail; everything inside the loop is contained
/// and logged. The session is closed exactly once whether or not any page
/// produced records, including when `page_count <= 0` and the loop never
/// runs.
pub async fn run(
    driver: &dyn Driver,
    req: &ScrapeRequest,
    progress: Option<&ProgressSender>,
) -> Result<Vec<Question>, DriverError> {
    let started = Instant::now();
    let mut seq = 0u64;

    let session = driver.new_session().await?;
    emit(
        &progress,
        &req.run_id,
        &mut seq,
        ScrapeEventKind::RunStarted {
            base_url: req.base_url.clone(),
            page_count: req.page_count,
        },
    );

    let records = drive_pages(&*session, req, progress, &mut seq).await;

    // Release the session unconditionally; a close failure is not allowed to
    // take the harvested records down with it.
    if let Err(e) = session.close().await {
        warn!("failed to close browser session: {e}");
    }

    emit(
        &progress,
        &req.run_id,
        &mut seq,
        ScrapeEventKind::RunComplete {
            total_records: records.len(),
            pages_visited: req.page_count.max(0),
            elapsed_ms: started.elapsed().as_millis() as u64,
        },
    );

    Ok(records)
}

/// The sequential page loop. Infallible: every error in here is contained as
/// an empty page batch.
async fn drive_pages(
    session: &dyn DriverSession,
    req: &ScrapeRequest,
    progress: Option<&ProgressSender>,
    seq: &mut u64,
) -> Vec<Question> {
    let mut accumulator: Vec<Question> = Vec::new();

    // Explicit boundary: a non-positive page count visits no pages.
    if req.page_count <= 0 {
        info!("page count {} is not positive, nothing to visit", req.page_count);
        return accumulator;
    }

    for page in 1..=req.page_count {
        emit(&progress, &req.run_id, seq, ScrapeEventKind::PageStarted { page });
        let page_started = Instant::now();

        let url = match page_url(&req.base_url, page) {
            Ok(u) => u,
            Err(e) => {
                warn!("page {page}: bad listing URL `{}`: {e}", req.base_url);
                emit(
                    &progress,
                    &req.run_id,
                    seq,
                    ScrapeEventKind::PageFailed {
                        page,
                        reason: e.to_string(),
                    },
                );
                continue;
            }
        };

        match session.navigate(&url, req.nav_timeout_ms).await {
            Ok(()) => {
                let batch = harvest::harvest_page(session, req.wait_timeout_ms).await;
                info!("page {page}: harvested {} item(s)", batch.len());
                emit(
                    &progress,
                    &req.run_id,
                    seq,
                    ScrapeEventKind::PageComplete {
                        page,
                        items: batch.len(),
                        elapsed_ms: page_started.elapsed().as_millis() as u64,
                    },
                );
                accumulator.extend(batch);
            }
            Err(e) => {
                warn!("page {page}: navigation failed, continuing: {e}");
                emit(
                    &progress,
                    &req.run_id,
                    seq,
                    ScrapeEventKind::PageFailed {
                        page,
                        reason: e.to_string(),
                    },
                );
            }
        }
    }

    accumulator
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_url_appends_fixed_query() {
        let url = page_url("https://stackoverflow.com/questions", 3).unwrap();
        assert_eq!(url, "https://stackoverflow.com/questions?tab=newest&page=3");
    }

    #[test]
    fn test_page_url_rejects_invalid_base() {
        assert!(page_url("not a url", 1).is_err());
    }

    #[test]
    fn test_request_defaults() {
        let req = ScrapeRequest::new("https://stackoverflow.com/questions", 5);
        assert_eq!(req.page_count, 5);
        assert_eq!(req.nav_timeout_ms, DEFAULT_NAV_TIMEOUT_MS);
        assert_eq!(req.wait_timeout_ms, DEFAULT_WAIT_TIMEOUT_MS);
        assert!(!req.run_id.is_empty());
    }
}
