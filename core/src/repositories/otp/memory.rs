//! In-memory implementation of OtpStore
//!
//! Used by tests and by local development runs without a database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::otp_record::{OtpPurpose, OtpRecord, MAX_ATTEMPTS};
use crate::errors::DomainError;

use super::r#trait::OtpStore;

/// OTP store backed by an insertion-ordered vector behind a lock
#[derive(Clone, Default)]
pub struct InMemoryOtpStore {
    records: Arc<RwLock<Vec<OtpRecord>>>,
}

impl InMemoryOtpStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored record, in insertion order
    pub async fn all(&self) -> Vec<OtpRecord> {
        self.records.read().await.clone()
    }

    /// Fetch a record by id
    pub async fn get(&self, id: uuid::Uuid) -> Option<OtpRecord> {
        self.records.read().await.iter().find(|r| r.id == id).cloned()
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the store holds no records
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl OtpStore for InMemoryOtpStore {
    async fn insert(&self, record: OtpRecord) -> Result<OtpRecord, DomainError> {
        let mut records = self.records.write().await;

        if records.iter().any(|r| r.id == record.id) {
            return Err(DomainError::Internal {
                message: format!("Duplicate OTP record id {}", record.id),
            });
        }

        records.push(record.clone());
        Ok(record)
    }

    async fn find_latest_valid(
        &self,
        phone: &str,
        purpose: OtpPurpose,
        now: DateTime<Utc>,
    ) -> Result<Option<OtpRecord>, DomainError> {
        let records = self.records.read().await;

        // max_by_key keeps the last maximum, so ties go to the latest insert
        Ok(records
            .iter()
            .filter(|r| r.phone == phone && r.purpose == purpose)
            .filter(|r| !r.verified && r.expires_at > now)
            .max_by_key(|r| r.created_at)
            .cloned())
    }

    async fn count_since(&self, phone: &str, since: DateTime<Utc>) -> Result<u64, DomainError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| r.phone == phone && r.created_at > since)
            .count() as u64)
    }

    async fn update(&self, record: &OtpRecord, expected_attempts: i32) -> Result<bool, DomainError> {
        let mut records = self.records.write().await;

        match records.iter_mut().find(|r| r.id == record.id) {
            Some(stored)
                if !stored.verified
                    && stored.attempts == expected_attempts
                    && expected_attempts < MAX_ATTEMPTS =>
            {
                stored.attempts = record.attempts;
                stored.verified = record.verified;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, DomainError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.created_at >= cutoff);
        Ok((before - records.len()) as u64)
    }
}
