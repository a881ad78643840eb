//! Tests for provider selection

use tk_shared::config::SmsConfig;

use crate::sms::create_sms_service;

#[test]
fn test_mock_provider_is_default() {
    let service = create_sms_service(&SmsConfig::default()).unwrap();
    assert_eq!(service.provider_name(), "Mock");
}

#[test]
fn test_unknown_provider_falls_back_to_mock() {
    let config = SmsConfig {
        provider: "carrier-pigeon".to_string(),
        ..SmsConfig::default()
    };
    assert_eq!(create_sms_service(&config).unwrap().provider_name(), "Mock");
}

#[test]
fn test_twilio_provider_requires_credentials() {
    let config = SmsConfig {
        provider: "twilio".to_string(),
        ..SmsConfig::default()
    };
    assert!(create_sms_service(&config).is_err());
}

#[test]
fn test_twilio_provider_with_credentials() {
    let config = SmsConfig {
        provider: "Twilio".to_string(),
        api_key: "ACtest".to_string(),
        api_secret: "secret".to_string(),
        from_number: "+15551234567".to_string(),
        ..SmsConfig::default()
    };
    assert_eq!(create_sms_service(&config).unwrap().provider_name(), "Twilio");
}
