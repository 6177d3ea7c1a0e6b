//! Storage collaborators consumed by the auth/CRM core
//!
//! The core never talks to a database directly; callers inject these
//! trait objects. Implementations are expected to be atomic at the
//! single-record level and to surface their own failures as
//! [`Error::Storage`](crate::error::Error::Storage) rather than
//! swallowing them.

pub mod memory;

use crate::domain::{Agent, AuthToken, Customer};
use crate::error::Result;
use async_trait::async_trait;

pub use memory::{MemoryAgentStore, MemoryCustomerStore, MemoryTokenStore};

/// Agent account persistence.
#[async_trait]
pub trait AgentStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Agent>>;
    async fn read(&self, id: i64) -> Result<Option<Agent>>;
    /// Persist a new agent; the store assigns the id.
    async fn create(&self, agent: Agent) -> Result<Agent>;
    /// Replace an existing agent record in full.
    async fn update(&self, agent: Agent) -> Result<Agent>;
}

/// Bearer-token persistence, keyed by selector.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn find_by_selector(&self, selector: &str) -> Result<Option<AuthToken>>;
    async fn create(&self, token: AuthToken) -> Result<AuthToken>;
    async fn delete(&self, token: &AuthToken) -> Result<()>;
}

/// Customer persistence.
#[async_trait]
pub trait CustomerStore: Send + Sync {
    async fn read(&self, id: i64) -> Result<Option<Customer>>;
    /// Persist a new customer; the store assigns the id.
    async fn create(&self, customer: Customer) -> Result<Customer>;
    async fn update(&self, customer: Customer) -> Result<Customer>;
    async fn delete(&self, id: i64) -> Result<()>;
    async fn find_by_agent(&self, agent_id: i64) -> Result<Vec<Customer>>;
}
