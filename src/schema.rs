// Copyright 2026 Gleaner Contributors
// SPDX-License-Identifier: Apache-2.0

//! The record schema and the per-field locator-strategy table.
//!
//! The field set and page structure are fixed at build time. Each field maps
//! to an ordered list of locator strategies tried until one resolves, so
//! layout drift on a single selector degrades that field rather than breaking
//! the whole extraction.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// CSS selector for the question-list container the harvester waits on.
pub const LIST_CONTAINER: &str = "#questions";

/// CSS selector for one question summary within the list container.
pub const ITEM_CONTAINER: &str = ".js-post-summary";

/// One extracted question. All fields are captured as raw display text:
/// counts carry locale-specific separators/suffixes ("1.2k") and timestamps
/// stay as displayed ("2 mins ago"). Numeric parsing is a downstream concern.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub title: String,
    pub url: String,
    pub view_count: String,
    pub vote_count: String,
    pub answer_count: String,
    pub posted_at: String,
}

impl Question {
    /// Field values in schema order, for row-oriented encoders.
    pub fn values(&self) -> [&str; 6] {
        [
            &self.title,
            &self.url,
            &self.view_count,
            &self.vote_count,
            &self.answer_count,
            &self.posted_at,
        ]
    }
}

/// The six record fields, in the fixed order used for extraction and export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    Title,
    Url,
    ViewCount,
    VoteCount,
    AnswerCount,
    PostedAt,
}

/// How a field's value is read once its element resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRead {
    /// Visible text of the element.
    Text,
    /// A named attribute of the element.
    Attribute(&'static str),
}

/// A candidate locator for one field, tried in table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocatorStrategy {
    /// Class-based selector, resolved relative to the item container.
    Css(&'static str),
    /// Structural path resolved against the whole document, parameterized by
    /// the item's 1-based position via an `{n}` placeholder. Fragile by
    /// nature; only ever a fallback.
    IndexedCss(&'static str),
}

impl LocatorStrategy {
    /// Materialize the selector for the item at the given zero-based index.
    pub fn selector(&self, index: usize) -> Cow<'static, str> {
        match self {
            Self::Css(s) => Cow::Borrowed(s),
            Self::IndexedCss(template) => {
                Cow::Owned(template.replace("{n}", &(index + 1).to_string()))
            }
        }
    }

    /// Whether this strategy resolves against the document rather than the
    /// item container.
    pub fn is_document_scoped(&self) -> bool {
        matches!(self, Self::IndexedCss(_))
    }
}

const TITLE_ANCHOR: &str = ".s-post-summary--content > h3 > a";

/// v2 of the posted-at structural path; the `time` element carries no stable
/// class hook, so the last-resort locator walks the page skeleton by position.
const POSTED_AT_STRUCTURAL_V2: &str =
    "body > div:nth-of-type(3) > div:nth-of-type(2) > div:nth-of-type(1) > div:nth-of-type(3) \
     > div:nth-child({n}) > div:nth-of-type(2) > div:nth-of-type(2) > div:nth-of-type(2) \
     > time > span";

impl Field {
    /// All fields in schema order. Record field order is fixed by this table,
    /// never by extraction completion order.
    pub const ALL: [Field; 6] = [
        Field::Title,
        Field::Url,
        Field::ViewCount,
        Field::VoteCount,
        Field::AnswerCount,
        Field::PostedAt,
    ];

    /// Column label used in the export header row.
    pub fn name(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Url => "url",
            Field::ViewCount => "view_count",
            Field::VoteCount => "vote_count",
            Field::AnswerCount => "answer_count",
            Field::PostedAt => "posted_at",
        }
    }

    /// Mandatory fields invalidate the whole item when unresolved; optional
    /// fields degrade to an empty string.
    pub fn is_mandatory(self) -> bool {
        matches!(self, Field::Title | Field::Url)
    }

    pub fn read(self) -> FieldRead {
        match self {
            Field::Url => FieldRead::Attribute("href"),
            _ => FieldRead::Text,
        }
    }

    /// Ordered candidate locators for this field.
    pub fn strategies(self) -> &'static [LocatorStrategy] {
        match self {
            Field::Title | Field::Url => &[LocatorStrategy::Css(TITLE_ANCHOR)],
            Field::VoteCount => &[LocatorStrategy::Css(
                ".s-post-summary--stats > div:nth-child(1) > span:first-child",
            )],
            Field::AnswerCount => &[LocatorStrategy::Css(
                ".s-post-summary--stats > div:nth-child(2) > span:first-child",
            )],
            Field::ViewCount => &[LocatorStrategy::Css(
                ".s-post-summary--stats > div:nth-child(3) > span:first-child",
            )],
            Field::PostedAt => &[
                LocatorStrategy::Css(".s-post-summary--meta time span"),
                LocatorStrategy::IndexedCss(POSTED_AT_STRUCTURAL_V2),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_order_is_fixed() {
        let names: Vec<&str> = Field::ALL.iter().map(|f| f.name()).collect();
        assert_eq!(
            names,
            vec![
                "title",
                "url",
                "view_count",
                "vote_count",
                "answer_count",
                "posted_at"
            ]
        );
    }

    #[test]
    fn test_mandatory_fields() {
        assert!(Field::Title.is_mandatory());
        assert!(Field::Url.is_mandatory());
        assert!(!Field::ViewCount.is_mandatory());
        assert!(!Field::PostedAt.is_mandatory());
    }

    #[test]
    fn test_url_read_via_href() {
        assert_eq!(Field::Url.read(), FieldRead::Attribute("href"));
        assert_eq!(Field::Title.read(), FieldRead::Text);
    }

    #[test]
    fn test_posted_at_tries_class_selector_before_structural_path() {
        let strategies = Field::PostedAt.strategies();
        assert_eq!(strategies.len(), 2);
        assert!(matches!(strategies[0], LocatorStrategy::Css(_)));
        assert!(matches!(strategies[1], LocatorStrategy::IndexedCss(_)));
    }

    #[test]
    fn test_indexed_selector_substitutes_one_based_position() {
        let s = LocatorStrategy::IndexedCss("div:nth-child({n}) > time");
        assert_eq!(s.selector(0), "div:nth-child(1) > time");
        assert_eq!(s.selector(11), "div:nth-child(12) > time");
        assert!(s.is_document_scoped());
    }

    #[test]
    fn test_question_values_follow_schema_order() {
        let q = Question {
            title: "t".into(),
            url: "u".into(),
            view_count: "vi".into(),
            vote_count: "vo".into(),
            answer_count: "a".into(),
            posted_at: "p".into(),
        };
        assert_eq!(q.values(), ["t", "u", "vi", "vo", "a", "p"]);
    }
}
