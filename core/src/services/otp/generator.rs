//! OTP code generation

use rand::{rngs::OsRng, Rng};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Smallest 6-digit code
pub const MIN_CODE: u32 = 100_000;

/// Largest 6-digit code
pub const MAX_CODE: u32 = 999_999;

/// Produces 6-digit numeric codes
pub trait OtpGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Draws codes uniformly from `MIN_CODE..=MAX_CODE` using the OS CSPRNG
///
/// `OsRng` is a stateless handle, so one instance is shared freely across
/// tasks.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecureOtpGenerator;

impl OtpGenerator for SecureOtpGenerator {
    fn generate(&self) -> String {
        let code: u32 = OsRng.gen_range(MIN_CODE..=MAX_CODE);
        code.to_string()
    }
}

/// Returns a predetermined sequence of codes, repeating the last one
#[derive(Debug)]
pub struct FixedOtpGenerator {
    codes: Vec<String>,
    next: AtomicUsize,
}

impl FixedOtpGenerator {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            codes: vec![code.into()],
            next: AtomicUsize::new(0),
        }
    }

    /// Append a code to hand out after the previous ones
    pub fn then(mut self, code: impl Into<String>) -> Self {
        self.codes.push(code.into());
        self
    }
}

impl OtpGenerator for FixedOtpGenerator {
    fn generate(&self) -> String {
        let index = self.next.fetch_add(1, Ordering::SeqCst);
        let last = self.codes.len() - 1;
        self.codes[index.min(last)].clone()
    }
}
