//! Postgres implementation of the OtpRepository trait.
//!
//! One row per email in `otp_records`, with the staged flow payload stored
//! as JSONB. The conditional writes behind the resend throttle are expressed
//! directly in SQL so the database's per-row atomicity carries the
//! single-writer-per-key guarantee across server instances.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

use itsp_core::domain::entities::otp_record::{OtpRecord, StagedPayload};
use itsp_core::errors::DomainError;
use itsp_core::repositories::OtpRepository;

/// Postgres implementation of OtpRepository
pub struct PgOtpRepository {
    pool: PgPool,
}

impl PgOtpRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Convert a database row to an OtpRecord entity
    fn row_to_record(row: &sqlx::postgres::PgRow) -> Result<OtpRecord, DomainError> {
        let staged_json: serde_json::Value = row
            .try_get("staged")
            .map_err(|e| DomainError::Database(format!("Failed to get staged: {}", e)))?;

        let staged: StagedPayload = serde_json::from_value(staged_json)
            .map_err(|e| DomainError::Database(format!("Invalid staged payload: {}", e)))?;

        Ok(OtpRecord {
            email: row
                .try_get("email")
                .map_err(|e| DomainError::Database(format!("Failed to get email: {}", e)))?,
            code: row
                .try_get("code")
                .map_err(|e| DomainError::Database(format!("Failed to get code: {}", e)))?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(|e| DomainError::Database(format!("Failed to get expires_at: {}", e)))?,
            staged,
            resend_count: row
                .try_get("resend_count")
                .map_err(|e| DomainError::Database(format!("Failed to get resend_count: {}", e)))?,
            last_resend_at: row.try_get("last_resend_at").map_err(|e| {
                DomainError::Database(format!("Failed to get last_resend_at: {}", e))
            })?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| DomainError::Database(format!("Failed to get created_at: {}", e)))?,
        })
    }

    fn staged_to_json(staged: &StagedPayload) -> Result<serde_json::Value, DomainError> {
        serde_json::to_value(staged)
            .map_err(|e| DomainError::Database(format!("Failed to encode staged payload: {}", e)))
    }
}

#[async_trait]
impl OtpRepository for PgOtpRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<OtpRecord>, DomainError> {
        let query = r#"
            SELECT email, code, expires_at, staged,
                   resend_count, last_resend_at, created_at
            FROM otp_records
            WHERE email = $1
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Database(format!("Database query failed: {}", e)))?;

        match result {
            Some(row) => Ok(Some(Self::row_to_record(&row)?)),
            None => Ok(None),
        }
    }

    async fn upsert(&self, record: OtpRecord) -> Result<(), DomainError> {
        let staged = Self::staged_to_json(&record.staged)?;

        let query = r#"
            INSERT INTO otp_records
                (email, code, expires_at, staged, resend_count, last_resend_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (email) DO UPDATE SET
                code = EXCLUDED.code,
                expires_at = EXCLUDED.expires_at,
                staged = EXCLUDED.staged,
                resend_count = EXCLUDED.resend_count,
                last_resend_at = EXCLUDED.last_resend_at,
                created_at = EXCLUDED.created_at
        "#;

        sqlx::query(query)
            .bind(&record.email)
            .bind(&record.code)
            .bind(record.expires_at)
            .bind(staged)
            .bind(record.resend_count)
            .bind(record.last_resend_at)
            .bind(record.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Database(format!("Database insert failed: {}", e)))?;

        Ok(())
    }

    async fn upsert_checked(
        &self,
        record: OtpRecord,
        expected_resend_count: Option<i32>,
    ) -> Result<bool, DomainError> {
        let staged = Self::staged_to_json(&record.staged)?;

        let result = match expected_resend_count {
            // First issuance through the resend path: claim the key only if
            // nobody else has
            None => {
                let query = r#"
                    INSERT INTO otp_records
                        (email, code, expires_at, staged, resend_count, last_resend_at, created_at)
                    VALUES ($1, $2, $3, $4, $5, $6, $7)
                    ON CONFLICT (email) DO NOTHING
                "#;

                sqlx::query(query)
                    .bind(&record.email)
                    .bind(&record.code)
                    .bind(record.expires_at)
                    .bind(staged)
                    .bind(record.resend_count)
                    .bind(record.last_resend_at)
                    .bind(record.created_at)
                    .execute(&self.pool)
                    .await
            }
            // Update applies only if the counter still matches what the
            // caller observed at read time
            Some(expected) => {
                let query = r#"
                    UPDATE otp_records SET
                        code = $2,
                        expires_at = $3,
                        staged = $4,
                        resend_count = $5,
                        last_resend_at = $6,
                        created_at = $7
                    WHERE email = $1 AND resend_count = $8
                "#;

                sqlx::query(query)
                    .bind(&record.email)
                    .bind(&record.code)
                    .bind(record.expires_at)
                    .bind(staged)
                    .bind(record.resend_count)
                    .bind(record.last_resend_at)
                    .bind(record.created_at)
                    .bind(expected)
                    .execute(&self.pool)
                    .await
            }
        }
        .map_err(|e| DomainError::Database(format!("Conditional write failed: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, email: &str) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM otp_records WHERE email = $1")
            .bind(email)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Database(format!("Database delete failed: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}
