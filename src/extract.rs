// Copyright 2026 Gleaner Contributors
// SPDX-License-Identifier: Apache-2.0

//! Field Extractor: pull the fixed field schema out of one item container.
//!
//! All six field lookups are independent read-only DOM queries and are issued
//! concurrently. Field order in the resulting record is fixed by the schema,
//! not by completion order.

use crate::driver::{DriverSession, ElementHandle};
use crate::errors::ExtractError;
use crate::schema::{Field, FieldRead, Question};

/// Extract one question from its container element.
///
/// `index` is the container's zero-based position on the page; the posted-at
/// field's structural fallback locator is parameterized by it.
///
/// Fails with [`ExtractError::MissingMandatoryField`] when `title` or `url`
/// does not resolve to a non-empty value; missing optional fields degrade to
/// an empty string.
pub async fn extract_question(
    session: &dyn DriverSession,
    container: &ElementHandle,
    index: usize,
) -> Result<Question, ExtractError> {
    let (title, url, view_count, vote_count, answer_count, posted_at) = tokio::join!(
        resolve_field(session, container, index, Field::Title),
        resolve_field(session, container, index, Field::Url),
        resolve_field(session, container, index, Field::ViewCount),
        resolve_field(session, container, index, Field::VoteCount),
        resolve_field(session, container, index, Field::AnswerCount),
        resolve_field(session, container, index, Field::PostedAt),
    );

    let title = title.ok_or(ExtractError::MissingMandatoryField {
        field: "title",
        index,
    })?;
    let url = url.ok_or(ExtractError::MissingMandatoryField {
        field: "url",
        index,
    })?;

    Ok(Question {
        title,
        url,
        view_count: view_count.unwrap_or_default(),
        vote_count: vote_count.unwrap_or_default(),
        answer_count: answer_count.unwrap_or_default(),
        posted_at: posted_at.unwrap_or_default(),
    })
}

/// Try each of the field's locator strategies in table order; the first one
/// that resolves to a non-empty value wins. Driver errors count as
/// non-resolution; the caller's mandatory/optional policy decides what that
/// means for the item.
async fn resolve_field(
    session: &dyn DriverSession,
    container: &ElementHandle,
    index: usize,
    field: Field,
) -> Option<String> {
    for strategy in field.strategies() {
        let selector = strategy.selector(index);
        let scope = if strategy.is_document_scoped() {
            None
        } else {
            Some(container)
        };

        let handle = match session.find_element(scope, &selector).await {
            Ok(Some(h)) => h,
            Ok(None) | Err(_) => continue,
        };

        let value = match field.read() {
            FieldRead::Text => session.text(&handle).await.ok(),
            FieldRead::Attribute(name) => {
                session.attribute(&handle, name).await.ok().flatten()
            }
        };

        match value {
            Some(v) if !v.is_empty() => return Some(v),
            _ => continue,
        }
    }
    None
}
