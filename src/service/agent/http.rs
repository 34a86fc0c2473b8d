//! HTTP implementation of the query agent.
//!
//! Talks to a remote agent service:
//! - `GET {endpoint}/health` for the startup reachability check.
//! - `POST {endpoint}/query` with `{"input": ...}`, answered by `{"output": ...}`
//!   on success or `{"error": ...}` otherwise.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::base::{
    config::Config,
    types::{Res, Void},
};

use super::{AgentError, GenericQueryAgent, QueryAgent};

// Extra methods on `QueryAgent` applied by the http implementation.

impl QueryAgent {
    pub fn http(config: &Config) -> Res<Self> {
        let agent = HttpQueryAgent::new(config)?;
        Ok(Self { inner: Arc::new(agent) })
    }
}

// Wire types.

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    output: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

// Specific implementations.

/// HTTP query agent client.
#[derive(Clone)]
pub struct HttpQueryAgent {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpQueryAgent {
    /// Create a new HTTP query agent client.
    #[instrument(name = "HttpQueryAgent::new", skip_all)]
    pub fn new(config: &Config) -> Res<Self> {
        let client = reqwest::Client::builder().build()?;
        let endpoint = config.agent_endpoint.trim_end_matches('/').to_string();

        info!("Query agent endpoint: {}", endpoint);

        Ok(Self {
            client,
            endpoint,
            api_key: config.agent_api_key.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.endpoint, path)
    }
}

#[async_trait]
impl GenericQueryAgent for HttpQueryAgent {
    #[instrument(skip_all)]
    async fn health_check(&self) -> Void {
        let response = self
            .client
            .get(self.url("health"))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to reach query agent at {}: {}", self.endpoint, e))?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!("Query agent health check returned {}.", response.status()));
        }

        Ok(())
    }

    #[instrument(skip_all)]
    async fn run(&self, query: &str) -> Res<String> {
        let response = self
            .client
            .post(self.url("query"))
            .bearer_auth(&self.api_key)
            .json(&QueryRequest { input: query })
            .send()
            .await
            .map_err(AgentError::Transport)?;

        let status = response.status();
        debug!("Query agent responded with {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ErrorResponse>(&body) {
                Ok(e) => e.error,
                Err(_) if body.trim().is_empty() => status.to_string(),
                Err(_) => body.trim().to_string(),
            };

            return Err(AgentError::Rejected(message).into());
        }

        let body = response.json::<QueryResponse>().await.map_err(AgentError::Transport)?;

        Ok(body.output)
    }
}

// Tests.
