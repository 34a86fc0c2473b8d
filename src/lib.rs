//! Library root for `askdb-bot`.
//!
//! Askdb-bot lets people ask questions about a SQL database from Slack:
//! - Listens for @-mentions and plain messages in channels it has joined
//! - Posts a placeholder right away, then asks a query agent for the answer
//! - Overwrites the placeholder with the answer (or the error), plus elapsed time
//!
//! The bot integrates with Slack for chat and with an external query agent
//! that does the SQL and language-model work. The architecture is built around
//! traits that allow for different implementations of each service.

#[deny(missing_docs)]
pub mod base;
pub mod interaction;
pub mod runtime;
pub mod service;

use base::{config::Config, types::Void};
use rustls::crypto;
use tracing::info;

/// Public async entry for the binary crate.
///
/// Sets up necessary services and starts the runtime:
/// - Initializes the crypto provider
/// - Creates the runtime context with the query agent and chat clients
/// - Starts the main event loop for processing messages
pub async fn start(config: Config) -> Void {
    info!("Starting askdb-bot ...");

    // Start the crypto provider.
    crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install the rustls crypto provider."))?;

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config).await?;

    // Start the runtime.
    runtime.start().await?;

    Ok(())
}
