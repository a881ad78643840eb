//! SMS Service Module
//!
//! SMS provider implementations for delivering OTP codes.
//!
//! ## Features
//!
//! - **SMS Service Trait**: Common interface for all SMS providers
//! - **Mock Implementation**: Logs messages for development
//! - **Twilio Support**: Production SMS via the Twilio REST API
//! - **Gateway Adapter**: Exposes any provider as the core `SmsGateway`

use std::sync::Arc;
use tk_shared::config::SmsConfig;

pub mod gateway_adapter;
pub mod mock_sms;
pub mod sms_service;
pub mod twilio;

// Re-export commonly used types
pub use gateway_adapter::SmsGatewayAdapter;
pub use mock_sms::MockSmsService;
pub use sms_service::{is_valid_phone_number, to_e164, SmsService};
pub use twilio::{TwilioConfig, TwilioSmsService};

use crate::InfrastructureError;

#[cfg(test)]
mod tests;

/// Create an SMS service based on configuration
///
/// Unknown providers fall back to the mock implementation. A Twilio
/// provider with incomplete credentials is an error.
pub fn create_sms_service(config: &SmsConfig) -> Result<Arc<dyn SmsService>, InfrastructureError> {
    match config.provider.to_ascii_lowercase().as_str() {
        "mock" => Ok(Arc::new(MockSmsService::new())),
        "twilio" => {
            let service = TwilioSmsService::new(TwilioConfig::from(config)).map_err(|e| {
                tracing::error!("Failed to initialize Twilio SMS service: {}", e);
                e
            })?;
            Ok(Arc::new(service))
        }
        _ => {
            tracing::warn!(
                "Unknown SMS provider '{}', using mock implementation",
                config.provider
            );
            Ok(Arc::new(MockSmsService::new()))
        }
    }
}
