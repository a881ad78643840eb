//! SMS message templates for OTP delivery

use crate::domain::entities::otp_record::OtpPurpose;

/// Brand name embedded in every message
pub const BRAND: &str = "Tiki";

/// Build the SMS body for `code`, stating a validity of `validity_minutes`
pub fn otp_message(code: &str, purpose: OtpPurpose, validity_minutes: i64) -> String {
    let validity = format!("Valid for {} minutes.", validity_minutes);
    match purpose {
        OtpPurpose::Register => format!(
            "Your {} registration code is: {}. {} Do not share this code.",
            BRAND, code, validity
        ),
        OtpPurpose::Login => format!(
            "Your {} login code is: {}. {} Do not share this code.",
            BRAND, code, validity
        ),
        OtpPurpose::Verify => format!(
            "Your {} phone verification code is: {}. {}",
            BRAND, code, validity
        ),
        OtpPurpose::Reset => format!(
            "Your {} password reset code is: {}. {} Do not share this code.",
            BRAND, code, validity
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_message() {
        assert_eq!(
            otp_message("123456", OtpPurpose::Register, 5),
            "Your Tiki registration code is: 123456. Valid for 5 minutes. Do not share this code."
        );
    }

    #[test]
    fn test_verify_message_has_no_sharing_warning() {
        assert_eq!(
            otp_message("654321", OtpPurpose::Verify, 5),
            "Your Tiki phone verification code is: 654321. Valid for 5 minutes."
        );
    }

    #[test]
    fn test_every_purpose_embeds_code_and_validity() {
        for purpose in OtpPurpose::ALL {
            let message = otp_message("246810", purpose, 7);
            assert!(message.contains("246810"));
            assert!(message.contains("Valid for 7 minutes."));
        }
    }

    #[test]
    fn test_messages_differ_by_purpose() {
        assert_ne!(
            otp_message("123456", OtpPurpose::Login, 5),
            otp_message("123456", OtpPurpose::Reset, 5)
        );
    }
}
