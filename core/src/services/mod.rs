//! Business services containing domain logic and use cases.

pub mod otp;

// Re-export commonly used types
pub use otp::{
    otp_message, Clock, FixedOtpGenerator, ManualClock,
    OtpCleanupConfig, OtpCleanupTask, OtpGenerator, OtpService, OtpServiceConfig,
    SecureOtpGenerator, SmsGateway, SystemClock,
};
