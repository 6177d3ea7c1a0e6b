//! Authentication: password verification, bearer tokens, per-request sessions

pub mod password;
pub mod session;
pub mod token;

pub use password::{hash_password, needs_rehash, verify_password};
pub use session::AuthSession;
pub use token::{TOKEN_TTL_DAYS, SELECTOR_BYTES, VALIDATOR_BYTES};
