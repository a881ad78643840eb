//! Tests for SMS services

#[cfg(test)]
mod create_service_tests;
#[cfg(test)]
mod gateway_adapter_tests;
#[cfg(test)]
mod mock_sms_tests;
