//! Unit tests for the OTP record entity

use chrono::{Duration, TimeZone, Utc};

use crate::domain::entities::otp_record::{
    OtpPurpose, OtpRecord, DEFAULT_EXPIRATION_MINUTES, MAX_ATTEMPTS,
};

fn issued_at() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
}

fn record() -> OtpRecord {
    OtpRecord::new(
        "0901234567".to_string(),
        "123456".to_string(),
        OtpPurpose::Verify,
        issued_at(),
        Duration::minutes(DEFAULT_EXPIRATION_MINUTES),
    )
}

#[test]
fn test_new_record() {
    let record = record();

    assert_eq!(record.phone, "0901234567");
    assert_eq!(record.attempts, 0);
    assert!(!record.verified);
    assert_eq!(record.created_at, issued_at());
    assert_eq!(record.expires_at, issued_at() + Duration::minutes(5));
    assert_eq!(record.remaining_attempts(), MAX_ATTEMPTS);
    assert!(record.is_verifiable_at(issued_at()));
}

#[test]
fn test_records_get_distinct_ids() {
    assert_ne!(record().id, record().id);
}

#[test]
fn test_expiry_boundary() {
    let record = record();

    assert!(!record.is_expired_at(record.expires_at - Duration::seconds(1)));
    assert!(record.is_expired_at(record.expires_at));
    assert!(!record.is_verifiable_at(record.expires_at));
}

#[test]
fn test_correct_attempt_verifies_and_counts() {
    let record = record();
    let outcome = record.register_attempt("123456", issued_at()).unwrap();

    assert!(outcome.matched);
    assert!(outcome.next.verified);
    assert_eq!(outcome.next.attempts, 1);
    assert_eq!(outcome.next.id, record.id);
    // the original value is untouched
    assert_eq!(record.attempts, 0);
    assert!(!record.verified);
}

#[test]
fn test_wrong_attempt_only_counts() {
    let outcome = record().register_attempt("999999", issued_at()).unwrap();

    assert!(!outcome.matched);
    assert!(!outcome.next.verified);
    assert_eq!(outcome.next.attempts, 1);
    assert_eq!(outcome.next.remaining_attempts(), MAX_ATTEMPTS - 1);
}

#[test]
fn test_code_comparison_is_exact() {
    let record = record();

    assert!(!record.register_attempt("12345", issued_at()).unwrap().matched);
    assert!(!record.register_attempt("1234567", issued_at()).unwrap().matched);
    assert!(!record.register_attempt(" 123456", issued_at()).unwrap().matched);
}

#[test]
fn test_attempts_exhaust_after_max() {
    let mut current = record();
    for _ in 0..MAX_ATTEMPTS {
        current = current.register_attempt("000000", issued_at()).unwrap().next;
    }

    assert!(current.is_exhausted());
    assert_eq!(current.remaining_attempts(), 0);
    assert!(current.register_attempt("123456", issued_at()).is_none());
}

#[test]
fn test_verified_record_is_terminal() {
    let verified = record().register_attempt("123456", issued_at()).unwrap().next;

    assert!(!verified.is_verifiable_at(issued_at()));
    assert!(verified.register_attempt("123456", issued_at()).is_none());
}

#[test]
fn test_expired_record_rejects_attempts() {
    let record = record();
    let later = record.expires_at + Duration::seconds(1);

    assert!(record.register_attempt("123456", later).is_none());
}

#[test]
fn test_purpose_string_forms() {
    for purpose in OtpPurpose::ALL {
        assert_eq!(purpose.as_str().parse::<OtpPurpose>().unwrap(), purpose);
        assert_eq!(purpose.to_string(), purpose.as_str());
    }
    assert_eq!("login".parse::<OtpPurpose>().unwrap(), OtpPurpose::Login);
    assert!("TRANSFER".parse::<OtpPurpose>().is_err());
}

#[test]
fn test_purpose_serializes_upper_case() {
    let json = serde_json::to_string(&OtpPurpose::Reset).unwrap();
    assert_eq!(json, "\"RESET\"");

    let parsed: OtpPurpose = serde_json::from_str("\"REGISTER\"").unwrap();
    assert_eq!(parsed, OtpPurpose::Register);
}

#[test]
fn test_purpose_deserializes_case_insensitively() {
    let parsed: OtpPurpose = serde_json::from_str("\"login\"").unwrap();
    assert_eq!(parsed, OtpPurpose::Login);

    let parsed: OtpPurpose = serde_json::from_str("\" Reset \"").unwrap();
    assert_eq!(parsed, OtpPurpose::Reset);

    let err = serde_json::from_str::<OtpPurpose>("\"transfer\"").unwrap_err();
    assert!(err.to_string().contains("Unknown OTP purpose"));
}
