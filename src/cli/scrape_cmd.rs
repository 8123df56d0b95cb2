//! `gleaner scrape` — the interactive harvest-and-export run.
//!
//! Prompts for the two run parameters, drives the pipeline, and writes the
//! CSV artifact. Per-page progress is rendered from the pipeline's broadcast
//! events; page-level failures never abort the run, only configuration and
//! the final write do.

use crate::cli::output::{self, Styled};
use crate::driver::chromium::ChromiumDriver;
use crate::driver::Driver;
use crate::export::{self, ExportConfig};
use crate::input::{self, ConsoleInput};
use crate::paginate::{self, ScrapeRequest};
use crate::progress::{self, ProgressReceiver, ScrapeEventKind};
use anyhow::{Context, Result};
use indicatif::ProgressBar;
use std::path::Path;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

/// The listing this tool harvests. Pagination parameters are appended per
/// page by the pipeline.
pub const LISTING_URL: &str = "https://stackoverflow.com/questions";

/// Run the scrape command.
pub async fn run() -> Result<()> {
    let s = Styled::new();

    // Both run parameters are interactive; bad input aborts here, before any
    // browser work starts.
    let mut console = ConsoleInput::new()?;
    let page_count = input::prompt_page_count(&mut console)?;
    let destination = input::prompt_destination(&mut console)?;

    if !output::is_quiet() && !output::is_json() {
        eprintln!("  Starting Chromium...");
    }
    let driver = ChromiumDriver::new()
        .await
        .context("browser startup failed")?;

    let req = ScrapeRequest::new(LISTING_URL, page_count);
    let (tx, rx) = progress::channel();
    let renderer = tokio::spawn(render_progress(rx, page_count));

    let result = paginate::run(&driver, &req, Some(&tx)).await;

    // Close the channel so the renderer task drains and exits.
    drop(tx);
    let _ = renderer.await;

    if let Err(e) = driver.shutdown().await {
        warn!("browser shutdown failed: {e}");
    }

    let records = result.context("scrape run failed")?;
    let stats =
        export::export_records(&records, Path::new(&destination), &ExportConfig::default())?;

    store_in_cache(&records).await;

    if output::is_json() {
        output::print_json(&serde_json::json!({
            "records": stats.rows_written,
            "bytes": stats.bytes_written,
            "pages": page_count,
            "destination": destination,
        }));
    } else if !output::is_quiet() {
        eprintln!(
            "  {} Exported {} record(s) to {destination}",
            s.ok_sym(),
            stats.rows_written
        );
    }

    Ok(())
}

/// Render pipeline progress until the channel closes.
async fn render_progress(mut rx: ProgressReceiver, page_count: i64) {
    let interactive = !output::is_quiet() && !output::is_json();
    let bar = if interactive && page_count > 0 {
        Some(ProgressBar::new(page_count as u64))
    } else {
        None
    };
    let s = Styled::new();

    loop {
        let event = match rx.recv().await {
            Ok(ev) => ev.event,
            Err(RecvError::Lagged(_)) => continue,
            Err(RecvError::Closed) => break,
        };
        match event {
            ScrapeEventKind::PageStarted { page } => {
                if let Some(bar) = &bar {
                    bar.println(format!("  Fetching page {page}"));
                }
            }
            ScrapeEventKind::PageComplete { page, items, .. } => {
                info!("page {page} complete: {items} item(s)");
                if let Some(bar) = &bar {
                    bar.inc(1);
                }
            }
            ScrapeEventKind::PageFailed { page, reason } => {
                if let Some(bar) = &bar {
                    bar.println(format!("  {} page {page} failed: {reason}", s.warn_sym()));
                    bar.inc(1);
                }
            }
            ScrapeEventKind::RunComplete { total_records, .. } => {
                info!("run complete: {total_records} record(s)");
            }
            ScrapeEventKind::RunStarted { .. } | ScrapeEventKind::Warning { .. } => {}
        }
    }

    if let Some(bar) = bar {
        bar.finish_and_clear();
    }
}

#[cfg(feature = "redis-cache")]
async fn store_in_cache(records: &[crate::schema::Question]) {
    use crate::cache::{QuestionCache, DEFAULT_KEY, REDIS_URL_ENV};

    let Ok(url) = std::env::var(REDIS_URL_ENV) else {
        tracing::debug!("{REDIS_URL_ENV} not set; skipping record cache");
        return;
    };
    match QuestionCache::connect(&url).await {
        Ok(mut cache) => match cache.store(DEFAULT_KEY, records).await {
            Ok(()) => info!("cached {} record(s) under `{DEFAULT_KEY}`", records.len()),
            Err(e) => warn!("record cache store failed: {e:#}"),
        },
        Err(e) => warn!("record cache unavailable: {e:#}"),
    }
}

#[cfg(not(feature = "redis-cache"))]
async fn store_in_cache(_records: &[crate::schema::Question]) {}
