//! Mock SMS Service Implementation
//!
//! Logs SMS messages instead of sending them. Used for local development
//! and tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tk_shared::phone::mask_phone_number;
use tracing::{info, warn};
use uuid::Uuid;

use super::sms_service::{is_valid_phone_number, SmsService};
use crate::InfrastructureError;

/// Mock SMS service for development and testing
///
/// This implementation:
/// - Validates phone numbers
/// - Generates mock message IDs
/// - Keeps the sent messages for inspection
/// - Prints the message body only when console output is on
#[derive(Clone)]
pub struct MockSmsService {
    /// Counter for tracking number of messages sent
    message_count: Arc<AtomicU64>,
    /// Messages sent so far as (phone, body)
    sent: Arc<Mutex<Vec<(String, String)>>>,
    /// Whether to simulate failures
    simulate_failure: Arc<AtomicBool>,
    /// Whether to print messages to console
    console_output: bool,
}

impl MockSmsService {
    /// Create a new mock SMS service that prints to the console
    pub fn new() -> Self {
        Self::with_options(true, false)
    }

    /// Create a mock service with configurable options
    pub fn with_options(console_output: bool, simulate_failure: bool) -> Self {
        Self {
            message_count: Arc::new(AtomicU64::new(0)),
            sent: Arc::new(Mutex::new(Vec::new())),
            simulate_failure: Arc::new(AtomicBool::new(simulate_failure)),
            console_output,
        }
    }

    /// Get the total number of messages sent
    pub fn get_message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }

    /// Reset the message counter and the sent log
    pub fn reset_counter(&self) {
        self.message_count.store(0, Ordering::SeqCst);
        if let Ok(mut sent) = self.sent.lock() {
            sent.clear();
        }
    }

    /// Enable or disable failure simulation
    pub fn set_simulate_failure(&self, simulate: bool) {
        self.simulate_failure.store(simulate, Ordering::SeqCst);
    }

    /// Messages sent so far as (phone, body)
    pub fn sent_messages(&self) -> Vec<(String, String)> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }
}

impl Default for MockSmsService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SmsService for MockSmsService {
    async fn send_sms(&self, phone_number: &str, message: &str) -> Result<String, InfrastructureError> {
        let masked_phone = mask_phone_number(phone_number);

        if !is_valid_phone_number(phone_number) {
            return Err(InfrastructureError::Sms(format!(
                "Invalid phone number format: {}",
                masked_phone
            )));
        }

        if self.simulate_failure.load(Ordering::SeqCst) {
            warn!(
                "Mock SMS service simulating failure for phone: {}",
                masked_phone
            );
            return Err(InfrastructureError::Sms(
                "Simulated SMS sending failure".to_string(),
            ));
        }

        let message_id = format!("mock_{}", Uuid::new_v4());
        let count = self.message_count.fetch_add(1, Ordering::SeqCst) + 1;
        if let Ok(mut sent) = self.sent.lock() {
            sent.push((phone_number.to_string(), message.to_string()));
        }

        if self.console_output {
            println!("\n{}", "=".repeat(60));
            println!("MOCK SMS SERVICE - MESSAGE #{}", count);
            println!("{}", "=".repeat(60));
            println!("To: {}", masked_phone);
            println!("Message ID: {}", message_id);
            println!("Content: {}", message);
            println!("{}\n", "=".repeat(60));
        }

        info!(
            target: "sms_service",
            provider = "mock",
            phone = %masked_phone,
            message_id = %message_id,
            message_length = message.len(),
            "SMS sent successfully (mock)"
        );

        Ok(message_id)
    }

    fn provider_name(&self) -> &str {
        "Mock"
    }
}
