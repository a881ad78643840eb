pub mod error;
pub mod otp;

pub use error::ErrorResponse;
pub use otp::{OtpResponse, SendOtpRequest, VerifyOtpRequest};
