// Copyright 2026 Gleaner Contributors
// SPDX-License-Identifier: Apache-2.0

//! Progress event types and broadcast channel for run telemetry.
//!
//! The pagination loop emits `ScrapeEvent`s as it works, which flow through a
//! `tokio::sync::broadcast` channel to all subscribers (CLI progress bar,
//! log sinks). When no subscriber exists, events are silently dropped.

use serde::{Deserialize, Serialize};

/// A progress event emitted during a scrape run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeEvent {
    /// The run ID this event belongs to.
    pub run_id: String,
    /// Monotonically increasing sequence number.
    pub seq: u64,
    /// The kind of progress event.
    pub event: ScrapeEventKind,
}

/// The specific kind of progress event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ScrapeEventKind {
    /// The run has started.
    RunStarted { base_url: String, page_count: i64 },
    /// Navigation to a listing page is beginning.
    PageStarted { page: i64 },
    /// One page was harvested.
    PageComplete {
        page: i64,
        items: usize,
        elapsed_ms: u64,
    },
    /// A page failed to load and degraded to an empty batch.
    PageFailed { page: i64, reason: String },
    /// The run finished; the accumulator is complete.
    RunComplete {
        total_records: usize,
        pages_visited: i64,
        elapsed_ms: u64,
    },
    /// A non-fatal warning occurred.
    Warning { message: String },
}

/// Sender handle for emitting progress events.
///
/// Backed by a `tokio::sync::broadcast` channel so multiple listeners can
/// subscribe independently. When no listeners exist, `send()` returns an
/// error which we silently ignore (zero cost when nobody's watching).
pub type ProgressSender = tokio::sync::broadcast::Sender<ScrapeEvent>;

/// Receiver handle for consuming progress events.
pub type ProgressReceiver = tokio::sync::broadcast::Receiver<ScrapeEvent>;

/// Create a new progress broadcast channel with a bounded buffer.
///
/// 64 events covers typical runs: page counts in the tens, three events per
/// page plus run bookends.
pub fn channel() -> (ProgressSender, ProgressReceiver) {
    tokio::sync::broadcast::channel(64)
}

/// Convenience helper: emit a progress event, silently ignoring send errors
/// (which occur when no receivers are listening).
pub fn emit(tx: &Option<&ProgressSender>, run_id: &str, seq: &mut u64, event: ScrapeEventKind) {
    if let Some(sender) = tx {
        *seq += 1;
        let _ = sender.send(ScrapeEvent {
            run_id: run_id.to_string(),
            seq: *seq,
            event,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrape_event_serialization() {
        let event = ScrapeEvent {
            run_id: "run-1".to_string(),
            seq: 1,
            event: ScrapeEventKind::PageStarted { page: 3 },
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("PageStarted"));

        // Roundtrip
        let parsed: ScrapeEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.run_id, "run-1");
        assert_eq!(parsed.seq, 1);
    }

    #[test]
    fn test_run_complete_serialization() {
        let event = ScrapeEvent {
            run_id: "run-9".to_string(),
            seq: 12,
            event: ScrapeEventKind::RunComplete {
                total_records: 150,
                pages_visited: 3,
                elapsed_ms: 8200,
            },
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("RunComplete"));
        assert!(json.contains("150"));
    }

    #[test]
    fn test_channel_no_receivers() {
        let (tx, rx) = channel();
        drop(rx); // No receivers
                  // Should not panic
        emit(
            &Some(&tx),
            "test",
            &mut 0,
            ScrapeEventKind::Warning {
                message: "test".to_string(),
            },
        );
    }

    #[test]
    fn test_emit_none_sender() {
        // Should be a no-op
        emit(
            &None,
            "test",
            &mut 0,
            ScrapeEventKind::Warning {
                message: "test".to_string(),
            },
        );
    }

    #[test]
    fn test_emit_increments_seq() {
        let (tx, mut rx) = channel();
        let mut seq = 0;
        emit(
            &Some(&tx),
            "r",
            &mut seq,
            ScrapeEventKind::PageStarted { page: 1 },
        );
        emit(
            &Some(&tx),
            "r",
            &mut seq,
            ScrapeEventKind::PageStarted { page: 2 },
        );
        assert_eq!(seq, 2);
        assert_eq!(rx.try_recv().unwrap().seq, 1);
        assert_eq!(rx.try_recv().unwrap().seq, 2);
    }
}
