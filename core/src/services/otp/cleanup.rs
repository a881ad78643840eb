//! Background retention cleanup for OTP records

use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::errors::DomainResult;
use crate::repositories::OtpStore;

use super::config::OtpCleanupConfig;
use super::service::OtpService;
use super::traits::SmsGateway;

/// Periodically deletes OTP records past the retention window
pub struct OtpCleanupTask<S: OtpStore + 'static, G: SmsGateway + 'static> {
    service: Arc<OtpService<S, G>>,
    config: OtpCleanupConfig,
}

impl<S: OtpStore + 'static, G: SmsGateway + 'static> OtpCleanupTask<S, G> {
    pub fn new(service: Arc<OtpService<S, G>>, config: OtpCleanupConfig) -> Self {
        Self { service, config }
    }

    /// Run a single cleanup cycle
    ///
    /// Returns 0 without touching the store when cleanup is disabled.
    pub async fn run_once(&self) -> DomainResult<u64> {
        if !self.config.enabled {
            return Ok(0);
        }
        self.service.cleanup_expired_otps().await
    }

    /// Spawn the cleanup loop on the current tokio runtime
    ///
    /// The first cycle runs immediately. Failed cycles are logged and the
    /// loop keeps going. Returns `None` when cleanup is disabled.
    pub fn start_background_task(self: Arc<Self>) -> Option<JoinHandle<()>> {
        if !self.config.enabled {
            warn!("OTP cleanup task is disabled");
            return None;
        }

        let period = std::time::Duration::from_secs(self.config.interval_seconds.max(1));

        Some(tokio::spawn(async move {
            info!(
                "OTP cleanup task started - will run every {} seconds",
                self.config.interval_seconds
            );

            let mut interval_timer = tokio::time::interval(period);

            loop {
                interval_timer.tick().await;

                if let Err(e) = self.run_once().await {
                    error!("OTP cleanup cycle failed: {}", e);
                }
            }
        }))
    }
}
