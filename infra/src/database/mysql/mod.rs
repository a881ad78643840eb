//! MySQL repository implementations

mod otp_store;

pub use otp_store::MySqlOtpStore;
