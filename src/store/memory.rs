//! In-memory store implementations
//!
//! Backed by `Arc<RwLock<HashMap>>` so clones share state; ids are
//! assigned from a monotonic counter under the same lock. Updating or
//! deleting a record that does not exist is a storage error, keeping
//! not-found distinct from success.

use crate::domain::{Agent, AuthToken, Customer};
use crate::error::{Error, Result};
use crate::store::{AgentStore, CustomerStore, TokenStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

struct Table<T> {
    rows: HashMap<i64, T>,
    next_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: HashMap::new(),
            next_id: 0,
        }
    }
}

impl<T> Table<T> {
    fn assign_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory [`AgentStore`].
#[derive(Clone, Default)]
pub struct MemoryAgentStore {
    table: Arc<RwLock<Table<Agent>>>,
}

impl MemoryAgentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AgentStore for MemoryAgentStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Agent>> {
        let table = self.table.read().await;
        Ok(table.rows.values().find(|a| a.email == email).cloned())
    }

    async fn read(&self, id: i64) -> Result<Option<Agent>> {
        let table = self.table.read().await;
        Ok(table.rows.get(&id).cloned())
    }

    async fn create(&self, mut agent: Agent) -> Result<Agent> {
        let mut table = self.table.write().await;
        agent.id = table.assign_id();
        table.rows.insert(agent.id, agent.clone());
        Ok(agent)
    }

    async fn update(&self, agent: Agent) -> Result<Agent> {
        let mut table = self.table.write().await;
        if !table.rows.contains_key(&agent.id) {
            return Err(Error::Storage(format!("no agent with id {}", agent.id)));
        }
        table.rows.insert(agent.id, agent.clone());
        Ok(agent)
    }
}

/// In-memory [`TokenStore`], indexed by selector.
#[derive(Clone, Default)]
pub struct MemoryTokenStore {
    tokens: Arc<RwLock<HashMap<String, AuthToken>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn find_by_selector(&self, selector: &str) -> Result<Option<AuthToken>> {
        let tokens = self.tokens.read().await;
        Ok(tokens.get(selector).cloned())
    }

    async fn create(&self, token: AuthToken) -> Result<AuthToken> {
        let mut tokens = self.tokens.write().await;
        tokens.insert(token.selector.clone(), token.clone());
        Ok(token)
    }

    async fn delete(&self, token: &AuthToken) -> Result<()> {
        let mut tokens = self.tokens.write().await;
        tokens.remove(&token.selector);
        Ok(())
    }
}

/// In-memory [`CustomerStore`].
#[derive(Clone, Default)]
pub struct MemoryCustomerStore {
    table: Arc<RwLock<Table<Customer>>>,
}

impl MemoryCustomerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CustomerStore for MemoryCustomerStore {
    async fn read(&self, id: i64) -> Result<Option<Customer>> {
        let table = self.table.read().await;
        Ok(table.rows.get(&id).cloned())
    }

    async fn create(&self, mut customer: Customer) -> Result<Customer> {
        let mut table = self.table.write().await;
        customer.id = table.assign_id();
        table.rows.insert(customer.id, customer.clone());
        Ok(customer)
    }

    async fn update(&self, customer: Customer) -> Result<Customer> {
        let mut table = self.table.write().await;
        if !table.rows.contains_key(&customer.id) {
            return Err(Error::Storage(format!(
                "no customer with id {}",
                customer.id
            )));
        }
        table.rows.insert(customer.id, customer.clone());
        Ok(customer)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut table = self.table.write().await;
        table.rows.remove(&id);
        Ok(())
    }

    async fn find_by_agent(&self, agent_id: i64) -> Result<Vec<Customer>> {
        let table = self.table.read().await;
        let mut customers: Vec<Customer> = table
            .rows
            .values()
            .filter(|c| c.agent_id == agent_id)
            .cloned()
            .collect();
        customers.sort_by_key(|c| c.id);
        Ok(customers)
    }
}
