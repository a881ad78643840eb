//! Phone OTP route handlers
//!
//! - `POST /api/v1/otp/send` - issue a code and deliver it by SMS
//! - `POST /api/v1/otp/resend` - issue another code for the same phone
//! - `POST /api/v1/otp/verify` - check a code

pub mod resend;
pub mod send;
pub mod verify;
