//! Query agent integration.
//!
//! The query agent is the service that turns a natural-language question into
//! an answer, doing whatever SQL and language-model work it needs internally.
//! The bot only ever sees the narrow [`GenericQueryAgent`] contract, so a
//! different agent can be swapped in without touching the interaction layer.

pub mod http;

use std::{ops::Deref, sync::Arc, time::Duration};

use async_trait::async_trait;

use crate::base::types::{Res, Void};

// Traits.

/// Generic query agent trait that clients must implement.
#[async_trait]
pub trait GenericQueryAgent: Send + Sync + 'static {
    /// Check that the agent is reachable.
    ///
    /// Called once at startup; a failure here keeps the bot from starting.
    async fn health_check(&self) -> Void;

    /// Answer a single question.
    ///
    /// May take arbitrarily long. Errors should carry a human-readable message,
    /// since it is shown to the user.
    async fn run(&self, query: &str) -> Res<String>;
}

// Errors.

/// Failures of a single query.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// The agent did not answer within the configured time.
    #[error("query timed out after {0:?}")]
    Timeout(Duration),
    /// The agent answered with an error.
    #[error("{0}")]
    Rejected(String),
    /// The request never produced a usable response.
    #[error("query agent request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The agent future panicked.
    #[error("query agent crashed: {0}")]
    Panicked(String),
}

// Structs.

/// Query agent client for the application.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct QueryAgent {
    inner: Arc<dyn GenericQueryAgent>,
}

impl Deref for QueryAgent {
    type Target = dyn GenericQueryAgent;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl QueryAgent {
    pub fn new(inner: Arc<dyn GenericQueryAgent>) -> Self {
        Self { inner }
    }
}
