//! CLI interface for WECRM

pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "wecrm")]
#[command(version = "0.1.0")]
#[command(about = "Single-tenant CRM backend service", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new wecrm.toml configuration file
    Init,

    /// Run the HTTP API server
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long, env = "WECRM_HOST")]
        host: Option<String>,

        /// Port to bind to (overrides config)
        #[arg(long, env = "WECRM_PORT")]
        port: Option<u16>,
    },
}
