//! Unit tests for mock SMS service

use crate::sms::{MockSmsService, SmsService};
use crate::InfrastructureError;

#[tokio::test]
async fn test_mock_sms_send_success() {
    let service = MockSmsService::with_options(false, false);
    let result = service.send_sms("+14155552671", "Test message").await;

    let message_id = result.unwrap();
    assert!(message_id.starts_with("mock_"));
    assert_eq!(service.get_message_count(), 1);
    assert_eq!(
        service.sent_messages(),
        vec![("+14155552671".to_string(), "Test message".to_string())]
    );
}

#[tokio::test]
async fn test_mock_sms_invalid_phone() {
    let service = MockSmsService::with_options(false, false);
    let result = service.send_sms("1234567890", "Test message").await;

    match result {
        Err(InfrastructureError::Sms(msg)) => assert!(msg.contains("Invalid phone number")),
        other => panic!("Expected Sms error, got {:?}", other),
    }
    assert_eq!(service.get_message_count(), 0);
}

#[tokio::test]
async fn test_mock_sms_simulate_failure() {
    let service = MockSmsService::with_options(false, false);
    service.set_simulate_failure(true);

    assert!(service.send_sms("+14155552671", "Test message").await.is_err());
    assert_eq!(service.get_message_count(), 0);

    service.set_simulate_failure(false);
    assert!(service.send_sms("+14155552671", "Test message").await.is_ok());
    assert_eq!(service.get_message_count(), 1);
}

#[tokio::test]
async fn test_mock_sms_counter() {
    let service = MockSmsService::with_options(false, false);

    for i in 1..=3 {
        let _ = service.send_sms("+14155552671", &format!("Message {}", i)).await;
        assert_eq!(service.get_message_count(), i);
    }

    service.reset_counter();
    assert_eq!(service.get_message_count(), 0);
    assert!(service.sent_messages().is_empty());
}

#[test]
fn test_provider_name() {
    let service = MockSmsService::new();
    assert_eq!(service.provider_name(), "Mock");
}
