use sha2::{Digest, Sha256};

use crate::normalize::digits_only;

/// Salted one-way hash: lower-case hex of SHA-256(salt || value).
/// Empty input yields `None`, never a placeholder hash.
pub fn hash_with_salt(salt: &str, value: &str) -> Option<String> {
    if value.is_empty() {
        return None;
    }
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(value.as_bytes());
    Some(hex::encode(hasher.finalize()))
}

/// Mask a card number, keeping only the last 4 digits visible.
/// Fewer than 4 digits masks everything; otherwise the masked string is
/// re-grouped into chunks of 4 joined by `-` (e.g. `XXXX-XXXX-XXXX-6467`).
pub fn mask_card(number: &str) -> Option<String> {
    if number.is_empty() {
        return None;
    }
    let digits = digits_only(number);
    if digits.len() < 4 {
        return Some("X".repeat(digits.len()));
    }
    let mut masked = "X".repeat(digits.len() - 4);
    masked.push_str(&digits[digits.len() - 4..]);
    let chunks: Vec<&str> = masked
        .as_bytes()
        .chunks(4)
        .map(|c| std::str::from_utf8(c).expect("ascii"))
        .collect();
    Some(chunks.join("-"))
}
