// Copyright 2026 Gleaner Contributors
// SPDX-License-Identifier: Apache-2.0

//! Optional Redis store for the accumulated record set.
//!
//! Best-effort: caching is skipped entirely when no connection string is
//! configured, and a store failure is a logged warning, never a run failure.
//! The connection string comes from the environment at process start; it is
//! never embedded in code.

use crate::schema::Question;
use anyhow::{Context, Result};
use redis::AsyncCommands;

/// Environment variable holding the Redis connection string.
pub const REDIS_URL_ENV: &str = "GLEANER_REDIS_URL";

/// Default key the full record set is stored under.
pub const DEFAULT_KEY: &str = "questions";

/// A connected record cache.
pub struct QuestionCache {
    conn: redis::aio::ConnectionManager,
}

impl QuestionCache {
    /// Connect using an explicitly supplied connection string.
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url).context("invalid Redis connection string")?;
        let conn = client
            .get_connection_manager()
            .await
            .context("failed to connect to Redis")?;
        Ok(Self { conn })
    }

    /// Store the full record set as one JSON value under `key`.
    pub async fn store(&mut self, key: &str, records: &[Question]) -> Result<()> {
        let payload = serde_json::to_string(records).context("failed to serialize records")?;
        self.conn
            .set::<_, _, ()>(key, payload)
            .await
            .context("failed to store records in Redis")?;
        Ok(())
    }
}
