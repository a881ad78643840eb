//! Tests for domain entities

#[cfg(test)]
mod otp_record_tests;
