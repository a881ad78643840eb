//! OTP store trait defining the persistence contract for OTP records.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::otp_record::{OtpPurpose, OtpRecord};
use crate::errors::DomainError;

/// Repository trait for OtpRecord persistence
///
/// The store is the only shared mutable state of the OTP subsystem.
/// Every mutation is atomic for a single record.
#[async_trait]
pub trait OtpStore: Send + Sync {
    /// Persist a newly issued record
    ///
    /// # Returns
    /// * `Ok(OtpRecord)` - The stored record
    /// * `Err(DomainError)` - Storage failure
    async fn insert(&self, record: OtpRecord) -> Result<OtpRecord, DomainError>;

    /// Find the most recent record for `phone` + `purpose` that is not
    /// verified and whose `expires_at` is after `now`
    ///
    /// Records are ordered by `created_at` descending; records created at
    /// the same instant are ordered by insertion, latest first. Records
    /// whose attempts are exhausted are still returned so that they keep
    /// shadowing older records.
    async fn find_latest_valid(
        &self,
        phone: &str,
        purpose: OtpPurpose,
        now: DateTime<Utc>,
    ) -> Result<Option<OtpRecord>, DomainError>;

    /// Count records for `phone`, of any purpose, created strictly after `since`
    async fn count_since(&self, phone: &str, since: DateTime<Utc>) -> Result<u64, DomainError>;

    /// Conditionally persist the `attempts` and `verified` fields of `record`
    ///
    /// The update applies only if the stored row with the same id still has
    /// `attempts == expected_attempts`, is not verified, and
    /// `expected_attempts` is below the attempt cap.
    ///
    /// # Returns
    /// * `Ok(true)` - The update was applied
    /// * `Ok(false)` - The row changed concurrently or no longer exists
    async fn update(&self, record: &OtpRecord, expected_attempts: i32) -> Result<bool, DomainError>;

    /// Delete every record created before `cutoff`, whatever its state
    ///
    /// # Returns
    /// * `Ok(u64)` - Number of deleted records
    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, DomainError>;
}
