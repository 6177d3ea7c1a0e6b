//! Per-request authenticated session
//!
//! An [`AuthSession`] is constructed fresh for each inbound request
//! with its storage collaborators injected, holds at most one
//! authenticated agent identity, and is discarded when the request
//! ends. It is not meant to be shared across concurrent requests.
//!
//! Every authentication decision is a boolean (or `Option`) return;
//! storage failures propagate as errors so that "database unreachable"
//! can never be mistaken for "wrong password".

use crate::auth::{password, token};
use crate::domain::{Agent, AuthToken, Customer, TokenKind};
use crate::error::Result;
use crate::store::{AgentStore, CustomerStore, TokenStore};
use chrono::{Duration, Utc};
use std::sync::Arc;

pub struct AuthSession {
    agents: Arc<dyn AgentStore>,
    tokens: Arc<dyn TokenStore>,
    customers: Arc<dyn CustomerStore>,
    current_agent_id: Option<i64>,
}

impl AuthSession {
    pub fn new(
        agents: Arc<dyn AgentStore>,
        tokens: Arc<dyn TokenStore>,
        customers: Arc<dyn CustomerStore>,
    ) -> Self {
        Self {
            agents,
            tokens,
            customers,
            current_agent_id: None,
        }
    }

    /// Whether this session has established an agent identity.
    pub fn is_authenticated(&self) -> bool {
        self.current_agent_id.is_some()
    }

    /// The authenticated agent's id, if any.
    pub fn current_agent_id(&self) -> Option<i64> {
        self.current_agent_id
    }

    /// Verify email/password credentials and establish identity.
    ///
    /// On a match with an outdated stored hash, the hash is recomputed
    /// at current parameters and persisted — a side effect independent
    /// of the returned boolean. Unknown email or wrong password leave
    /// the session untouched and return `false`.
    pub async fn verify_agent(&mut self, email: &str, plain_password: &str) -> Result<bool> {
        let Some(mut agent) = self.agents.find_by_email(email).await? else {
            return Ok(false);
        };
        if !password::verify_password(plain_password, &agent.password_hash) {
            return Ok(false);
        }
        if password::needs_rehash(&agent.password_hash) {
            agent.password_hash = password::hash_password(plain_password)?;
            self.agents.update(agent.clone()).await?;
            tracing::debug!(agent_id = agent.id, "upgraded password hash on login");
        }
        self.current_agent_id = Some(agent.id);
        Ok(true)
    }

    /// Read the authenticated agent's own record.
    pub async fn read_agent(&self) -> Result<Option<Agent>> {
        match self.current_agent_id {
            Some(id) => self.agents.read(id).await,
            None => Ok(None),
        }
    }

    /// Register a new agent account.
    ///
    /// The password is hashed before anything else; plaintext is never
    /// stored or compared. Returns `false` when the email is already
    /// taken by any existing agent.
    pub async fn register_agent(&self, name: &str, email: &str, plain_password: &str) -> Result<bool> {
        let password_hash = password::hash_password(plain_password)?;
        if self.agents.find_by_email(email).await?.is_some() {
            return Ok(false);
        }
        self.agents
            .create(Agent {
                id: 0,
                name: name.to_string(),
                email: email.to_string(),
                password_hash,
            })
            .await?;
        Ok(true)
    }

    /// Update the authenticated agent's own profile.
    ///
    /// Changing the email to one already owned by a different agent is
    /// rejected to preserve email uniqueness; the original record is
    /// left unchanged. Returns `false` when unauthenticated.
    pub async fn update_own_profile(
        &self,
        name: &str,
        email: &str,
        plain_password: &str,
    ) -> Result<bool> {
        let password_hash = password::hash_password(plain_password)?;
        let Some(id) = self.current_agent_id else {
            return Ok(false);
        };
        let Some(current) = self.agents.read(id).await? else {
            return Ok(false);
        };
        if current.email != email && self.agents.find_by_email(email).await?.is_some() {
            return Ok(false);
        }
        self.agents
            .update(Agent {
                id,
                name: name.to_string(),
                email: email.to_string(),
                password_hash,
            })
            .await?;
        Ok(true)
    }

    /// Issue a new bearer token for the authenticated agent.
    ///
    /// The returned string `"<selector>:<hex validator>"` is the only
    /// place the plaintext validator ever exists outside memory; the
    /// store receives only its SHA-384 hash. Returns `None` when
    /// unauthenticated.
    pub async fn issue_token(&self, kind: TokenKind) -> Result<Option<String>> {
        let Some(agent_id) = self.current_agent_id else {
            return Ok(None);
        };
        let selector = token::generate_selector();
        let validator = token::generate_validator();
        self.tokens
            .create(AuthToken {
                selector: selector.clone(),
                validator_hash: token::hash_validator(&validator),
                agent_id,
                expiration: Utc::now() + Duration::days(token::TOKEN_TTL_DAYS),
                kind,
            })
            .await?;
        Ok(Some(token::format_bearer(&selector, &validator)))
    }

    /// Validate a bearer string and establish identity on success.
    ///
    /// Malformed input and unknown selectors fail closed with no side
    /// effect. A token that is found but expired, or whose validator
    /// hash does not match, is deleted before returning `false`:
    /// failed validation is destructive by design, limiting brute-force
    /// guessing at the cost of one-shot token death on misuse. A token
    /// that validates stays live and reusable until expiry.
    pub async fn validate_token(&mut self, bearer: &str) -> Result<bool> {
        let Some((selector, validator)) = token::split_bearer(bearer) else {
            return Ok(false);
        };
        let Some(stored) = self.tokens.find_by_selector(selector).await? else {
            return Ok(false);
        };
        if Utc::now() <= stored.expiration {
            let presented = token::hash_validator(&validator);
            if token::constant_time_eq(presented.as_bytes(), stored.validator_hash.as_bytes()) {
                self.current_agent_id = Some(stored.agent_id);
                return Ok(true);
            }
        }
        self.tokens.delete(&stored).await?;
        Ok(false)
    }

    /// Create a customer owned by the authenticated agent. The
    /// `agent_id` on the input is overwritten with the session's own.
    pub async fn create_customer(&self, mut customer: Customer) -> Result<Option<Customer>> {
        let Some(agent_id) = self.current_agent_id else {
            return Ok(None);
        };
        customer.agent_id = agent_id;
        Ok(Some(self.customers.create(customer).await?))
    }

    pub async fn read_customer(&self, customer_id: i64) -> Result<Option<Customer>> {
        if !self.is_authenticated() {
            return Ok(None);
        }
        self.customers.read(customer_id).await
    }

    pub async fn update_customer(&self, customer: Customer) -> Result<Option<Customer>> {
        if !self.is_authenticated() {
            return Ok(None);
        }
        Ok(Some(self.customers.update(customer).await?))
    }

    /// Delete a customer. Returns `false` (a no-op, not an error) when
    /// unauthenticated.
    pub async fn delete_customer(&self, customer_id: i64) -> Result<bool> {
        if !self.is_authenticated() {
            return Ok(false);
        }
        self.customers.delete(customer_id).await?;
        Ok(true)
    }

    /// List all customers belonging to the authenticated agent.
    /// `None` when unauthenticated, as distinct from an empty list.
    pub async fn find_all_customers(&self) -> Result<Option<Vec<Customer>>> {
        match self.current_agent_id {
            Some(agent_id) => Ok(Some(self.customers.find_by_agent(agent_id).await?)),
            None => Ok(None),
        }
    }
}
