//! WECRM - Single-tenant CRM backend service
//!
//! Agent authentication (password verification with transparent rehash
//! and selector/validator bearer tokens) plus customer CRUD scoped to
//! the authenticated agent. This is the library interface; the `wecrm`
//! binary wraps it in a CLI and HTTP server.

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod store;

pub use auth::AuthSession;
pub use config::Config;
pub use error::Error;
