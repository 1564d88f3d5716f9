//! Postgres implementation of the AccountRepository trait.
//!
//! Supervisor rows are provisioned by an administrative process outside
//! this subsystem; only the profile fields and the password hash are
//! written here. Email comparisons go through LOWER() so that rows loaded
//! with mixed-case addresses still match the normalized key.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use itsp_core::domain::entities::otp_record::RegistrationProfile;
use itsp_core::domain::entities::supervisor::SupervisorAccount;
use itsp_core::errors::DomainError;
use itsp_core::repositories::AccountRepository;

/// Postgres implementation of AccountRepository
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Convert a database row to a SupervisorAccount entity
    fn row_to_account(row: &sqlx::postgres::PgRow) -> Result<SupervisorAccount, DomainError> {
        Ok(SupervisorAccount {
            email: row
                .try_get("email")
                .map_err(|e| DomainError::Database(format!("Failed to get email: {}", e)))?,
            name: row
                .try_get("name")
                .map_err(|e| DomainError::Database(format!("Failed to get name: {}", e)))?,
            school: row
                .try_get("school")
                .map_err(|e| DomainError::Database(format!("Failed to get school: {}", e)))?,
            department: row
                .try_get("department")
                .map_err(|e| DomainError::Database(format!("Failed to get department: {}", e)))?,
            faculty: row
                .try_get("faculty")
                .map_err(|e| DomainError::Database(format!("Failed to get faculty: {}", e)))?,
            phone: row
                .try_get("phone")
                .map_err(|e| DomainError::Database(format!("Failed to get phone: {}", e)))?,
            password_hash: row.try_get("password_hash").map_err(|e| {
                DomainError::Database(format!("Failed to get password_hash: {}", e))
            })?,
        })
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<SupervisorAccount>, DomainError> {
        let query = r#"
            SELECT email, name, school, department, faculty, phone, password_hash
            FROM supervisors
            WHERE LOWER(email) = $1
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Database(format!("Database query failed: {}", e)))?;

        match result {
            Some(row) => Ok(Some(Self::row_to_account(&row)?)),
            None => Ok(None),
        }
    }

    async fn activate(
        &self,
        email: &str,
        profile: &RegistrationProfile,
        password_hash: &str,
    ) -> Result<bool, DomainError> {
        let query = r#"
            UPDATE supervisors SET
                name = $2,
                school = $3,
                department = $4,
                faculty = $5,
                phone = $6,
                password_hash = $7
            WHERE LOWER(email) = $1
        "#;

        let result = sqlx::query(query)
            .bind(email)
            .bind(&profile.name)
            .bind(&profile.school)
            .bind(&profile.department)
            .bind(&profile.faculty)
            .bind(&profile.phone)
            .bind(password_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Database(format!("Database update failed: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn reset_password(&self, email: &str, password_hash: &str) -> Result<bool, DomainError> {
        let result =
            sqlx::query("UPDATE supervisors SET password_hash = $2 WHERE LOWER(email) = $1")
                .bind(email)
                .bind(password_hash)
                .execute(&self.pool)
                .await
                .map_err(|e| DomainError::Database(format!("Database update failed: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}
