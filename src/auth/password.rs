//! Password hashing and verification
//!
//! bcrypt output self-describes its algorithm, cost and salt, which is
//! what makes the transparent rehash-upgrade possible: on a successful
//! login the stored hash's cost is compared against the current default
//! and the hash is recomputed when the parameters are outdated.

use crate::error::Result;
use bcrypt::DEFAULT_COST;

/// Hash a plaintext password with the current default cost.
pub fn hash_password(plain: &str) -> Result<String> {
    Ok(bcrypt::hash(plain, DEFAULT_COST)?)
}

/// Verify a plaintext password against a stored bcrypt hash.
///
/// An unparseable stored hash never matches; verification failure is
/// always a plain `false`, never an error.
pub fn verify_password(plain: &str, stored: &str) -> bool {
    bcrypt::verify(plain, stored).unwrap_or(false)
}

/// Whether a stored hash was produced with outdated parameters and
/// should be recomputed on the next successful login.
pub fn needs_rehash(stored: &str) -> bool {
    match parse_cost(stored) {
        Some(cost) => cost != DEFAULT_COST,
        // Not a recognizable bcrypt string; upgrade it
        None => true,
    }
}

/// Extract the cost parameter from a `$2<x>$<cost>$...` hash string.
fn parse_cost(stored: &str) -> Option<u32> {
    let mut parts = stored.split('$');
    parts.next()?; // leading empty segment
    let version = parts.next()?;
    if !version.starts_with('2') {
        return None;
    }
    parts.next()?.parse().ok()
}
