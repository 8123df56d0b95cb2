// Copyright 2026 Gleaner Contributors
// SPDX-License-Identifier: Apache-2.0

//! Page Harvester: extract every item on one loaded listing page.
//!
//! Never fails the whole call: a page that does not load yields an empty
//! batch, and a single bad item only shortens the batch. Pages are
//! independent; a transient failure here must not lose already-harvested
//! pages.

use crate::driver::DriverSession;
use crate::extract;
use crate::schema::{self, Question};
use futures::future;
use tracing::{debug, warn};

/// Harvest all question summaries from the currently loaded page.
///
/// Waits (bounded) for the list container, enumerates item containers in
/// document order, and extracts them concurrently. Results are gathered in
/// container order, not completion order. Items failing mandatory-field
/// extraction are dropped and logged with their position.
pub async fn harvest_page(session: &dyn DriverSession, wait_timeout_ms: u64) -> Vec<Question> {
    let list = match session
        .wait_for_element(schema::LIST_CONTAINER, wait_timeout_ms)
        .await
    {
        Ok(handle) => handle,
        Err(e) => {
            warn!("question list did not appear, skipping page: {e}");
            return Vec::new();
        }
    };

    let containers = match session
        .find_all_elements(Some(&list), schema::ITEM_CONTAINER)
        .await
    {
        Ok(c) => c,
        Err(e) => {
            warn!("failed to enumerate item containers: {e}");
            return Vec::new();
        }
    };
    debug!("found {} item container(s)", containers.len());

    // Concurrent fan-out; join_all preserves input order, which re-indexes
    // every result back to its container position.
    let extractions = containers
        .iter()
        .enumerate()
        .map(|(index, container)| extract::extract_question(session, container, index));
    let results = future::join_all(extractions).await;

    results
        .into_iter()
        .filter_map(|result| match result {
            Ok(question) => Some(question),
            Err(e) => {
                warn!("dropping item: {e}");
                None
            }
        })
        .collect()
}
