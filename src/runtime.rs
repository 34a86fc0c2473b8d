//! Runtime services and shared state for the bot.

use tracing::{error, info, instrument};

use crate::{
    base::{
        config::Config,
        types::{Res, Void},
    },
    service::{agent::QueryAgent, chat::ChatClient},
};

/// Runtime service context that can be shared across the application.
///
/// Every service handle is created exactly once, in [`Runtime::new`], and only
/// read afterwards. The struct is trivially cloneable, allowing it to be passed
/// around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct Runtime {
    /// The configuration for the application.
    pub config: Config,
    /// The query agent instance.
    pub agent: QueryAgent,
    /// The chat client instance.
    pub chat: ChatClient,
}

impl Runtime {
    /// Create a new runtime instance.
    ///
    /// Fails if the query agent is unreachable or Slack rejects the tokens.
    #[instrument(skip_all)]
    pub async fn new(config: Config) -> Res<Self> {
        // Initialize the query agent, and make sure it is up before serving anything.
        let agent = QueryAgent::http(&config)?;

        if let Err(err) = agent.health_check().await {
            error!("Query agent is unreachable: {}", err);
            return Err(err);
        }

        info!("Query agent is reachable.");

        // Initialize the chat client.
        let chat = ChatClient::slack(&config, agent.clone()).await?;

        Ok(Self { config, agent, chat })
    }

    pub async fn start(&self) -> Void {
        self.chat.start().await
    }
}
