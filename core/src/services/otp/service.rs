//! Main OTP service implementation

use std::sync::Arc;
use tk_shared::phone::{mask_phone_number, normalize_and_validate};

use crate::domain::entities::otp_record::{OtpPurpose, OtpRecord, MAX_ATTEMPTS};
use crate::errors::{DomainResult, OtpError};
use crate::repositories::OtpStore;

use super::clock::{Clock, SystemClock};
use super::config::OtpServiceConfig;
use super::generator::{OtpGenerator, SecureOtpGenerator};
use super::traits::SmsGateway;

/// Upper bound on re-reads after losing a conditional update
///
/// Every lost race means another caller advanced the record, and a record
/// takes at most `MAX_ATTEMPTS` updates, so this is only reached when new
/// records keep arriving during the call.
const MAX_UPDATE_RETRIES: usize = (MAX_ATTEMPTS as usize) * 2 + 2;

/// Phone OTP issuance and verification
pub struct OtpService<S: OtpStore, G: SmsGateway> {
    /// Record persistence
    store: Arc<S>,
    /// SMS delivery
    gateway: Arc<G>,
    /// Time source
    clock: Arc<dyn Clock>,
    /// Code source
    generator: Arc<dyn OtpGenerator>,
    /// Service configuration
    config: OtpServiceConfig,
}

impl<S: OtpStore, G: SmsGateway> OtpService<S, G> {
    /// Create a new OTP service using the system clock and the OS CSPRNG
    ///
    /// # Arguments
    ///
    /// * `store` - OTP record store
    /// * `gateway` - SMS delivery gateway
    /// * `config` - Service configuration
    pub fn new(store: Arc<S>, gateway: Arc<G>, config: OtpServiceConfig) -> Self {
        Self {
            store,
            gateway,
            clock: Arc::new(SystemClock),
            generator: Arc::new(SecureOtpGenerator),
            config,
        }
    }

    /// Replace the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the code source
    pub fn with_generator(mut self, generator: Arc<dyn OtpGenerator>) -> Self {
        self.generator = generator;
        self
    }

    /// Issue a new OTP for `phone` and deliver it by SMS
    ///
    /// This method:
    /// 1. Normalizes and validates the phone number
    /// 2. Checks the per-phone issuance count in the rate-limit window
    /// 3. Generates a code and persists a fresh record
    /// 4. Delivers the code through the gateway, bounded by the delivery timeout
    ///
    /// The record is persisted before delivery and is kept when delivery
    /// fails, so it still counts toward the rate limit.
    ///
    /// # Returns
    ///
    /// * `Ok(OtpRecord)` - The persisted record; its code must not leave the service boundary
    /// * `Err(DomainError)` - Invalid phone, rate limit, delivery failure or store failure
    pub async fn generate_and_send_otp(&self, phone: &str, purpose: OtpPurpose) -> DomainResult<OtpRecord> {
        let phone = match normalize_and_validate(phone) {
            Some(phone) => phone,
            None => {
                tracing::warn!(
                    phone = %mask_phone_number(phone),
                    purpose = %purpose,
                    event = "otp_invalid_phone",
                    "Rejected OTP request with invalid phone number"
                );
                return Err(OtpError::InvalidPhoneFormat.into());
            }
        };
        let masked = mask_phone_number(&phone);

        let now = self.clock.now();
        let recent = self
            .store
            .count_since(&phone, now - self.config.rate_limit_window)
            .await?;
        if recent >= self.config.max_otp_per_window {
            tracing::warn!(
                phone = %masked,
                purpose = %purpose,
                recent = recent,
                event = "rate_limit_exceeded",
                "OTP request rate limit exceeded"
            );
            return Err(OtpError::RateLimitExceeded {
                window_minutes: self.config.rate_limit_window.num_minutes(),
            }
            .into());
        }

        let code = self.generator.generate();
        let record = self
            .store
            .insert(OtpRecord::new(phone, code, purpose, now, self.config.code_ttl))
            .await?;

        tracing::info!(
            phone = %masked,
            purpose = %purpose,
            otp_id = %record.id,
            expires_at = %record.expires_at,
            event = "otp_generated",
            "Generated new OTP"
        );

        let delivery = tokio::time::timeout(
            self.config.delivery_timeout,
            self.gateway.send_otp(&record.phone, &record.code, purpose),
        )
        .await;

        match delivery {
            Ok(Ok(message_id)) => {
                tracing::info!(
                    phone = %masked,
                    purpose = %purpose,
                    otp_id = %record.id,
                    message_id = %message_id,
                    event = "otp_sent",
                    "OTP delivered to SMS gateway"
                );
                Ok(record)
            }
            Ok(Err(reason)) => {
                tracing::error!(
                    phone = %masked,
                    purpose = %purpose,
                    otp_id = %record.id,
                    error = %reason,
                    event = "otp_delivery_failed",
                    "Failed to deliver OTP"
                );
                Err(OtpError::DeliveryFailed { reason }.into())
            }
            Err(_) => {
                tracing::error!(
                    phone = %masked,
                    purpose = %purpose,
                    otp_id = %record.id,
                    timeout_ms = self.config.delivery_timeout.as_millis() as u64,
                    event = "otp_delivery_timeout",
                    "OTP delivery timed out"
                );
                Err(OtpError::DeliveryFailed {
                    reason: format!(
                        "delivery timed out after {} ms",
                        self.config.delivery_timeout.as_millis()
                    ),
                }
                .into())
            }
        }
    }

    /// Check `code` against the latest valid record for `phone` + `purpose`
    ///
    /// Every attempt that reaches a verifiable record advances its attempt
    /// counter, including the successful one. The counter and the verified
    /// flag are written with a conditional update; losing a race re-reads
    /// the latest record and tries again.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The code matched and the record is now verified
    /// * `Ok(false)` - No valid record, attempts exhausted, or wrong code
    /// * `Err(DomainError)` - Store failure
    pub async fn verify_otp(&self, phone: &str, code: &str, purpose: OtpPurpose) -> DomainResult<bool> {
        let phone = match normalize_and_validate(phone) {
            Some(phone) => phone,
            None => {
                tracing::debug!(
                    phone = %mask_phone_number(phone),
                    purpose = %purpose,
                    event = "otp_verify_invalid_phone",
                    "Verification requested for invalid phone number"
                );
                return Ok(false);
            }
        };
        let masked = mask_phone_number(&phone);

        for _ in 0..MAX_UPDATE_RETRIES {
            let now = self.clock.now();
            let record = match self.store.find_latest_valid(&phone, purpose, now).await? {
                Some(record) => record,
                None => {
                    tracing::info!(
                        phone = %masked,
                        purpose = %purpose,
                        event = "otp_not_found",
                        "No valid OTP found for verification"
                    );
                    return Ok(false);
                }
            };

            let outcome = match record.register_attempt(code, now) {
                Some(outcome) => outcome,
                None => {
                    tracing::warn!(
                        phone = %masked,
                        purpose = %purpose,
                        otp_id = %record.id,
                        event = "max_attempts_exceeded",
                        "OTP verification attempts exhausted"
                    );
                    return Ok(false);
                }
            };

            if !self.store.update(&outcome.next, record.attempts).await? {
                tracing::debug!(
                    phone = %masked,
                    otp_id = %record.id,
                    event = "otp_update_conflict",
                    "Concurrent verification changed the record, retrying"
                );
                continue;
            }

            if outcome.matched {
                tracing::info!(
                    phone = %masked,
                    purpose = %purpose,
                    otp_id = %record.id,
                    event = "otp_verified_success",
                    "OTP verified successfully"
                );
            } else {
                tracing::warn!(
                    phone = %masked,
                    purpose = %purpose,
                    otp_id = %record.id,
                    remaining_attempts = outcome.next.remaining_attempts(),
                    event = "otp_verification_failed",
                    "OTP verification failed"
                );
            }
            return Ok(outcome.matched);
        }

        tracing::warn!(
            phone = %masked,
            purpose = %purpose,
            event = "otp_update_contention",
            "Gave up verifying OTP after repeated concurrent updates"
        );
        Ok(false)
    }

    /// Issue another OTP for `phone`
    ///
    /// Previous records are left untouched. They stop being reachable for
    /// verification once a newer one exists, and still count toward the
    /// rate limit.
    pub async fn resend_otp(&self, phone: &str, purpose: OtpPurpose) -> DomainResult<OtpRecord> {
        tracing::info!(
            phone = %mask_phone_number(phone),
            purpose = %purpose,
            event = "otp_resend_requested",
            "Resending OTP"
        );
        self.generate_and_send_otp(phone, purpose).await
    }

    /// Delete every record created before the retention cutoff
    ///
    /// # Returns
    ///
    /// * `Ok(u64)` - Number of deleted records
    pub async fn cleanup_expired_otps(&self) -> DomainResult<u64> {
        let cutoff = self.clock.now() - self.config.retention;
        let deleted = self.store.delete_older_than(cutoff).await?;

        tracing::info!(
            deleted = deleted,
            cutoff = %cutoff,
            event = "otp_cleanup",
            "Cleaned up old OTP records"
        );
        Ok(deleted)
    }
}
