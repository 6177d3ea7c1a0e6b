//! Selector/validator bearer tokens
//!
//! A bearer credential is two halves joined by a colon: a short public
//! selector used purely for indexed lookup, and a high-entropy secret
//! validator of which only the SHA-384 hash is persisted. Splitting the
//! lookup key from the secret keeps token-store lookups from leaking
//! timing about the secret half; the validator comparison itself is
//! constant-time.

use rand::RngCore;
use sha2::{Digest, Sha384};

/// Selector byte length before hex encoding (5 bytes = 10 hex chars).
pub const SELECTOR_BYTES: usize = 5;

/// Validator byte length before hex encoding (20 bytes = 40 hex chars).
pub const VALIDATOR_BYTES: usize = 20;

/// Token lifetime from issuance.
pub const TOKEN_TTL_DAYS: i64 = 30;

/// Generate a random selector (hex-encoded).
pub fn generate_selector() -> String {
    let mut bytes = [0u8; SELECTOR_BYTES];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Generate the raw secret half of a token. Never persisted; the caller
/// hands the bytes to the client and stores only [`hash_validator`].
pub fn generate_validator() -> [u8; VALIDATOR_BYTES] {
    let mut bytes = [0u8; VALIDATOR_BYTES];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    bytes
}

/// Hash a validator (hex SHA-384). A single fast pass is fine here:
/// unlike a password, the input is uniformly random.
pub fn hash_validator(validator: &[u8]) -> String {
    let mut hasher = Sha384::new();
    hasher.update(validator);
    hex::encode(hasher.finalize())
}

/// Assemble the wire form `"<selectorHex>:<validatorHex>"`.
pub fn format_bearer(selector: &str, validator: &[u8]) -> String {
    format!("{}:{}", selector, hex::encode(validator))
}

/// Parse a bearer string into its selector and decoded validator bytes.
///
/// Returns `None` on any malformation (missing separator, bad hex) —
/// validation fails closed instead of panicking on attacker input.
pub fn split_bearer(bearer: &str) -> Option<(&str, Vec<u8>)> {
    let (selector, validator_hex) = bearer.split_once(':')?;
    let validator = hex::decode(validator_hex).ok()?;
    Some((selector, validator))
}

/// Constant-time byte comparison to prevent timing attacks.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
