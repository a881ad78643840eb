//! Unit tests for the core gateway adapter

use std::sync::Arc;
use tk_core::domain::entities::otp_record::OtpPurpose;
use tk_core::services::SmsGateway;

use crate::sms::{MockSmsService, SmsGatewayAdapter};

#[tokio::test]
async fn test_adapter_sends_template_to_e164_number() {
    let provider = MockSmsService::with_options(false, false);
    let adapter = SmsGatewayAdapter::new(Arc::new(provider.clone()), "84");

    let message_id = adapter
        .send_otp("0901234567", "654321", OtpPurpose::Verify)
        .await
        .unwrap();

    assert!(message_id.starts_with("mock_"));
    let sent = provider.sent_messages();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "+84901234567");
    assert_eq!(
        sent[0].1,
        "Your Tiki phone verification code is: 654321. Valid for 5 minutes."
    );
}

#[tokio::test]
async fn test_adapter_states_configured_validity() {
    let provider = MockSmsService::with_options(false, false);
    let adapter =
        SmsGatewayAdapter::new(Arc::new(provider.clone()), "84").with_validity_minutes(3);

    adapter
        .send_otp("0901234567", "654321", OtpPurpose::Reset)
        .await
        .unwrap();

    assert!(provider.sent_messages()[0].1.contains("Valid for 3 minutes."));
}

#[tokio::test]
async fn test_adapter_maps_provider_failure_to_reason() {
    let provider = MockSmsService::with_options(false, true);
    let adapter = SmsGatewayAdapter::new(Arc::new(provider), "84");

    let reason = adapter
        .send_otp("0901234567", "654321", OtpPurpose::Login)
        .await
        .unwrap_err();

    assert!(reason.contains("Simulated SMS sending failure"));
}

#[tokio::test]
async fn test_adapter_rejects_unconvertible_phone_without_sending() {
    let provider = MockSmsService::with_options(false, false);
    let adapter = SmsGatewayAdapter::new(Arc::new(provider.clone()), "84");

    let reason = adapter
        .send_otp("0123", "654321", OtpPurpose::Login)
        .await
        .unwrap_err();

    assert!(reason.contains("E.164"));
    assert!(!reason.contains("0123"));
    assert_eq!(provider.get_message_count(), 0);
}

#[test]
fn test_adapter_reports_provider_name() {
    let adapter = SmsGatewayAdapter::new(Arc::new(MockSmsService::new()), "84");
    assert_eq!(adapter.provider_name(), "Mock");
}
