//! Server-authoritative time sources.
//!
//! Every expiry and cooldown comparison in the enrollment flow is made
//! against a single clock so that records written by one server instance
//! are judged consistently by another. [`PgClock`] reads the database's
//! clock, which is shared by construction; [`SystemClock`] is for
//! single-instance deployments and tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use itsp_core::services::ClockSource;

/// Clock backed by the host system time
#[derive(Clone, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ClockSource for SystemClock {
    async fn now(&self) -> Result<DateTime<Utc>, String> {
        Ok(Utc::now())
    }
}

/// Clock backed by the Postgres server via `SELECT NOW()`
#[derive(Clone)]
pub struct PgClock {
    pool: PgPool,
}

impl PgClock {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClockSource for PgClock {
    async fn now(&self) -> Result<DateTime<Utc>, String> {
        let row: (DateTime<Utc>,) = sqlx::query_as("SELECT NOW()")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| format!("Clock query failed: {}", e))?;
        Ok(row.0)
    }
}
