//! Phone OTP record entity and its state transitions.

use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Maximum number of verification attempts allowed per record
pub const MAX_ATTEMPTS: i32 = 3;

/// Length of the OTP code
pub const CODE_LENGTH: usize = 6;

/// Default validity window for a freshly issued code (5 minutes)
pub const DEFAULT_EXPIRATION_MINUTES: i64 = 5;

/// Use-case a code is scoped to
///
/// A code issued for one purpose is never visible to verification under
/// another purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum OtpPurpose {
    Register,
    Login,
    Verify,
    Reset,
}

impl OtpPurpose {
    /// All purposes in declaration order
    pub const ALL: [OtpPurpose; 4] = [
        OtpPurpose::Register,
        OtpPurpose::Login,
        OtpPurpose::Verify,
        OtpPurpose::Reset,
    ];

    /// Canonical storage and wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            OtpPurpose::Register => "REGISTER",
            OtpPurpose::Login => "LOGIN",
            OtpPurpose::Verify => "VERIFY",
            OtpPurpose::Reset => "RESET",
        }
    }
}

impl fmt::Display for OtpPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OtpPurpose {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "REGISTER" => Ok(OtpPurpose::Register),
            "LOGIN" => Ok(OtpPurpose::Login),
            "VERIFY" => Ok(OtpPurpose::Verify),
            "RESET" => Ok(OtpPurpose::Reset),
            _ => Err(format!("Unknown OTP purpose: {}", s)),
        }
    }
}

impl TryFrom<String> for OtpPurpose {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A single issued OTP and its verification state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpRecord {
    /// Unique identifier, assigned on creation
    pub id: Uuid,

    /// Normalized digit-only phone number
    pub phone: String,

    /// The 6-digit code sent to the phone
    pub code: String,

    /// Use-case this code is scoped to
    pub purpose: OtpPurpose,

    /// Timestamp after which the code can no longer be verified
    pub expires_at: DateTime<Utc>,

    /// Whether the code has been successfully verified
    pub verified: bool,

    /// Number of verification attempts made against this record
    pub attempts: i32,

    /// Timestamp when the record was created
    pub created_at: DateTime<Utc>,
}

/// Outcome of a single verification attempt against a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptOutcome {
    /// State to persist, with `attempts` advanced by one
    pub next: OtpRecord,
    /// Whether the candidate matched the stored code
    pub matched: bool,
}

impl OtpRecord {
    /// Creates a fresh, unverified record issued at `now`
    ///
    /// # Arguments
    ///
    /// * `phone` - Normalized phone number
    /// * `code` - Server-generated code
    /// * `purpose` - Use-case the code is scoped to
    /// * `now` - Issuance time
    /// * `validity` - How long the code stays verifiable
    pub fn new(
        phone: String,
        code: String,
        purpose: OtpPurpose,
        now: DateTime<Utc>,
        validity: Duration,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            phone,
            code,
            purpose,
            expires_at: now + validity,
            verified: false,
            attempts: 0,
            created_at: now,
        }
    }

    /// Checks if the code has expired at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Checks whether the attempt budget is used up
    pub fn is_exhausted(&self) -> bool {
        self.attempts >= MAX_ATTEMPTS
    }

    /// A record is verifiable while it is unverified, under the attempt cap
    /// and not expired
    pub fn is_verifiable_at(&self, now: DateTime<Utc>) -> bool {
        !self.verified && !self.is_exhausted() && !self.is_expired_at(now)
    }

    /// Attempts left before the record becomes unverifiable
    pub fn remaining_attempts(&self) -> i32 {
        (MAX_ATTEMPTS - self.attempts).max(0)
    }

    /// Computes the state after one verification attempt with `candidate`
    ///
    /// Returns `None` when the record is not verifiable at `now`; the
    /// record must then be left untouched. Otherwise the returned state has
    /// `attempts` advanced by one and `verified` set when the candidate
    /// matches. `self` is not modified.
    pub fn register_attempt(&self, candidate: &str, now: DateTime<Utc>) -> Option<AttemptOutcome> {
        if !self.is_verifiable_at(now) {
            return None;
        }

        let matched = constant_time_eq(self.code.as_bytes(), candidate.as_bytes());
        let next = OtpRecord {
            attempts: self.attempts + 1,
            verified: matched,
            ..self.clone()
        };

        Some(AttemptOutcome { next, matched })
    }
}
