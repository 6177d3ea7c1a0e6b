//! Domain records for agents, customers and bearer tokens

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A CRM agent account. Email is unique across agents; the password
/// hash is replaced only on rehash-upgrade or an explicit profile edit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    /// Unique agent identifier, assigned by the store
    pub id: i64,
    pub name: String,
    pub email: String,
    /// bcrypt hash; never a plaintext password
    #[serde(skip_serializing)]
    pub password_hash: String,
}

/// Kind tag for issued tokens. Only agent sessions exist today; the tag
/// keeps the selector/validator scheme extensible to other token kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    AgentSession,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::AgentSession => write!(f, "agent_session"),
        }
    }
}

/// One issued bearer credential.
///
/// The selector is the public lookup key; only the SHA-384 hash of the
/// secret half is ever stored. A token is valid while `now` is at or
/// before `expiration` and the presented secret hashes to
/// `validator_hash`. The first failed validation deletes the record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthToken {
    pub selector: String,
    pub validator_hash: String,
    pub agent_id: i64,
    pub expiration: DateTime<Utc>,
    pub kind: TokenKind,
}

/// A customer record, always scoped to the agent that owns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    /// Unique customer identifier, assigned by the store
    pub id: i64,
    /// Owning agent; set by the service on creation
    pub agent_id: i64,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub phone: String,
}
