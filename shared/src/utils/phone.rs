//! Phone number utilities

use once_cell::sync::Lazy;
use regex::Regex;

/// Minimum number of digits in a normalized phone number
pub const MIN_PHONE_DIGITS: usize = 10;

/// Maximum number of digits in a normalized phone number
pub const MAX_PHONE_DIGITS: usize = 15;

/// Fixed mask inserted between the visible head and tail of a phone number
pub const PHONE_MASK: &str = "****";

// Digits-only phone number as accepted on the wire
pub static PHONE_DIGITS_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{10,15}$").unwrap()
});

/// Normalize a phone number by stripping every non-digit character
pub fn normalize_phone_number(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Check that a normalized phone number has an acceptable digit count
pub fn is_valid_phone_length(normalized: &str) -> bool {
    (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&normalized.len())
}

/// Normalize and validate a raw phone number in one step
///
/// Returns `None` for blank input or when the digit count falls outside
/// `[MIN_PHONE_DIGITS, MAX_PHONE_DIGITS]`.
pub fn normalize_and_validate(phone: &str) -> Option<String> {
    if phone.trim().is_empty() {
        return None;
    }
    let normalized = normalize_phone_number(phone);
    is_valid_phone_length(&normalized).then_some(normalized)
}

/// Mask a phone number for responses and logs (e.g., 090****67)
///
/// Keeps the first 3 and last 2 characters. Anything shorter than 4
/// characters is masked entirely.
pub fn mask_phone_number(phone: &str) -> String {
    let chars: Vec<char> = phone.chars().collect();
    if chars.len() < 4 {
        return PHONE_MASK.to_string();
    }
    let head: String = chars[..3].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}{}{}", head, PHONE_MASK, tail)
}
