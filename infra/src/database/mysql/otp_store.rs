//! MySQL implementation of the OtpStore trait.
//!
//! Records live in the `phone_otps` table. Attempt updates are a single
//! conditional `UPDATE`, so concurrent verifications of one record are
//! serialized by the row lock InnoDB takes for the statement.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use tk_core::domain::entities::otp_record::{OtpPurpose, OtpRecord, MAX_ATTEMPTS};
use tk_core::errors::DomainError;
use tk_core::repositories::OtpStore;

const SELECT_COLUMNS: &str =
    "id, phone, code, purpose, expires_at, verified, attempts, created_at";

/// MySQL implementation of OtpStore
pub struct MySqlOtpStore {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlOtpStore {
    /// Create a new MySQL OTP store
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert a database row to an OtpRecord
    fn row_to_record(row: &sqlx::mysql::MySqlRow) -> Result<OtpRecord, DomainError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| DomainError::Internal { message: format!("Failed to get id: {}", e) })?;
        let purpose: String = row.try_get("purpose").map_err(|e| DomainError::Internal {
            message: format!("Failed to get purpose: {}", e),
        })?;

        Ok(OtpRecord {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Internal {
                message: format!("Invalid OTP UUID: {}", e),
            })?,
            phone: row.try_get("phone").map_err(|e| DomainError::Internal {
                message: format!("Failed to get phone: {}", e),
            })?,
            code: row.try_get("code").map_err(|e| DomainError::Internal {
                message: format!("Failed to get code: {}", e),
            })?,
            purpose: purpose
                .parse::<OtpPurpose>()
                .map_err(|e| DomainError::Internal { message: e })?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get expires_at: {}", e),
                })?,
            verified: row.try_get("verified").map_err(|e| DomainError::Internal {
                message: format!("Failed to get verified: {}", e),
            })?,
            attempts: row.try_get("attempts").map_err(|e| DomainError::Internal {
                message: format!("Failed to get attempts: {}", e),
            })?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get created_at: {}", e),
                })?,
        })
    }
}

#[async_trait]
impl OtpStore for MySqlOtpStore {
    async fn insert(&self, record: OtpRecord) -> Result<OtpRecord, DomainError> {
        let query = r#"
            INSERT INTO phone_otps (
                id, phone, code, purpose, expires_at, verified, attempts, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(record.id.to_string())
            .bind(&record.phone)
            .bind(&record.code)
            .bind(record.purpose.as_str())
            .bind(record.expires_at)
            .bind(record.verified)
            .bind(record.attempts)
            .bind(record.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to save OTP record: {}", e),
            })?;

        Ok(record)
    }

    async fn find_latest_valid(
        &self,
        phone: &str,
        purpose: OtpPurpose,
        now: DateTime<Utc>,
    ) -> Result<Option<OtpRecord>, DomainError> {
        let query = format!(
            r#"
            SELECT {}
            FROM phone_otps
            WHERE phone = ? AND purpose = ? AND verified = FALSE AND expires_at > ?
            ORDER BY created_at DESC, seq DESC
            LIMIT 1
            "#,
            SELECT_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(phone)
            .bind(purpose.as_str())
            .bind(now)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to find OTP record: {}", e),
            })?;

        row.as_ref().map(Self::row_to_record).transpose()
    }

    async fn count_since(&self, phone: &str, since: DateTime<Utc>) -> Result<u64, DomainError> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS recent FROM phone_otps WHERE phone = ? AND created_at > ?",
        )
        .bind(phone)
        .bind(since)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::Internal {
            message: format!("Failed to count OTP records: {}", e),
        })?;

        let recent: i64 = row.try_get("recent").map_err(|e| DomainError::Internal {
            message: format!("Failed to get count: {}", e),
        })?;

        Ok(recent.max(0) as u64)
    }

    async fn update(&self, record: &OtpRecord, expected_attempts: i32) -> Result<bool, DomainError> {
        let query = r#"
            UPDATE phone_otps
            SET attempts = ?, verified = ?
            WHERE id = ? AND attempts = ? AND verified = FALSE AND attempts < ?
        "#;

        let result = sqlx::query(query)
            .bind(record.attempts)
            .bind(record.verified)
            .bind(record.id.to_string())
            .bind(expected_attempts)
            .bind(MAX_ATTEMPTS)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to update OTP record: {}", e),
            })?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM phone_otps WHERE created_at < ?")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to delete old OTP records: {}", e),
            })?;

        Ok(result.rows_affected())
    }
}
