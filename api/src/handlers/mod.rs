pub mod error;

pub use error::{ApiError, INVALID_OTP_MESSAGE};
