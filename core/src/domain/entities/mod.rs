//! Domain entities representing core business objects.

pub mod otp_record;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use otp_record::{
    AttemptOutcome, OtpPurpose, OtpRecord, CODE_LENGTH, DEFAULT_EXPIRATION_MINUTES, MAX_ATTEMPTS,
};
