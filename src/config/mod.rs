//! Configuration management for WECRM

pub mod loader;
mod schema;

pub use loader::{load_config, load_config_from_path, save_config};
pub use schema::*;
