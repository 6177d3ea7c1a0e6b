//! HTTP API for WECRM

pub mod routes;
pub mod server;

pub use server::{run_server, AppState, SharedState};
