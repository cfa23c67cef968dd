//! Phone number normalization for `chatId` values.
//!
//! The relay never re-validates phone shape; callers must normalize first.

use crate::client::relay_client::ClientError;

/// Suffix of personal chat IDs.
pub const CHAT_SUFFIX: &str = "@c.us";

/// Strip non-digits, drop a leading `00`, prefix `1` to 10-digit numbers.
pub fn normalize_phone(input: &str) -> String {
    let digits: String = input.chars().filter(char::is_ascii_digit).collect();

    let digits = match digits.strip_prefix("00") {
        Some(rest) => rest.to_string(),
        None => digits,
    };

    if digits.len() == 10 {
        format!("1{}", digits)
    } else {
        digits
    }
}

/// Normalized numbers must be 10 to 15 digits.
pub fn is_valid_phone(normalized: &str) -> bool {
    (10..=15).contains(&normalized.len()) && normalized.bytes().all(|b| b.is_ascii_digit())
}

/// Normalize, validate, and append the chat suffix.
pub fn chat_id(input: &str) -> Result<String, ClientError> {
    let normalized = normalize_phone(input);
    if !is_valid_phone(&normalized) {
        return Err(ClientError::InvalidPhone(input.trim().to_string()));
    }
    Ok(format!("{}{}", normalized, CHAT_SUFFIX))
}
