//! Load configuration via `config` crate with env-override support.

use std::{ops::Deref, sync::Arc, time::Duration};

use serde::Deserialize;
use serde_with::{DurationSeconds, serde_as};

use crate::base::messages;

use super::types::{Res, Void};

/// Default time to wait on the query agent before giving up.
fn default_agent_timeout() -> Duration {
    Duration::from_secs(120)
}

/// Default placeholder text.
fn default_thinking_message() -> String {
    messages::THINKING_MESSAGE.to_string()
}

/// Default reply for an empty mention.
fn default_prompt_message() -> String {
    messages::PROMPT_MESSAGE.to_string()
}

/// Configuration for the bot.
#[derive(Debug, Clone)]
pub struct Config {
    /// Shared settings.
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

/// The settings themselves; see the field docs for the matching environment variables.
#[serde_as]
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ConfigInner {
    /// Slack bot token (`ASKDB_BOT_SLACK_BOT_TOKEN`).
    #[serde(default)]
    pub slack_bot_token: String,
    /// Slack app-level token used for socket mode (`ASKDB_BOT_SLACK_APP_TOKEN`).
    #[serde(default)]
    pub slack_app_token: String,
    /// Bearer credential for the query agent (`ASKDB_BOT_AGENT_API_KEY`).
    #[serde(default)]
    pub agent_api_key: String,
    /// Base URL of the query agent service (`ASKDB_BOT_AGENT_ENDPOINT`).
    #[serde(default)]
    pub agent_endpoint: String,
    /// Seconds to wait for a single answer (`ASKDB_BOT_AGENT_TIMEOUT`).
    #[serde_as(as = "DurationSeconds<u64>")]
    #[serde(default = "default_agent_timeout")]
    pub agent_timeout: Duration,
    /// Placeholder text shown while a query runs (`ASKDB_BOT_THINKING_MESSAGE`).
    #[serde(default = "default_thinking_message")]
    pub thinking_message: String,
    /// Reply sent when the bot is mentioned with no question (`ASKDB_BOT_PROMPT_MESSAGE`).
    #[serde(default = "default_prompt_message")]
    pub prompt_message: String,
}

impl Config {
    /// Loads the configuration from an optional TOML file and `ASKDB_BOT_*` environment variables.
    pub fn load(explicit_path: Option<&std::path::Path>) -> Res<Self> {
        let mut cfg = config::Config::builder();

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if std::path::Path::new(".hidden/config.toml").exists() {
            cfg = cfg.add_source(config::File::with_name(".hidden/config.toml"));
        }

        // Environment wins over the file.
        cfg = cfg.add_source(config::Environment::default().prefix("ASKDB_BOT"));

        let result = Config {
            inner: Arc::new(cfg.build()?.try_deserialize()?),
        };

        result.validate()?;

        Ok(result)
    }

    /// Checks that every required setting is present and sane.
    pub fn validate(&self) -> Void {
        let required = [
            (&self.slack_bot_token, "Slack bot token", "ASKDB_BOT_SLACK_BOT_TOKEN"),
            (&self.slack_app_token, "Slack app token", "ASKDB_BOT_SLACK_APP_TOKEN"),
            (&self.agent_api_key, "Query agent API key", "ASKDB_BOT_AGENT_API_KEY"),
            (&self.agent_endpoint, "Query agent endpoint", "ASKDB_BOT_AGENT_ENDPOINT"),
        ];

        for (value, name, env) in required {
            if value.trim().is_empty() {
                return Err(anyhow::anyhow!("{name} is not set (`{env}`)."));
            }
        }

        if !self.agent_endpoint.starts_with("http://") && !self.agent_endpoint.starts_with("https://") {
            return Err(anyhow::anyhow!("Query agent endpoint must be an http(s) URL, got `{}`.", self.agent_endpoint));
        }

        if self.agent_timeout < Duration::from_secs(1) || self.agent_timeout > Duration::from_secs(3600) {
            return Err(anyhow::anyhow!("Query agent timeout must be between 1 and 3600 seconds."));
        }

        Ok(())
    }
}

// Tests.

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    const FULL: &str = r#"
        slack_bot_token = "xoxb-test"
        slack_app_token = "xapp-test"
        agent_api_key = "secret"
        agent_endpoint = "http://localhost:8000"
    "#;

    #[test]
    fn test_load_applies_defaults() {
        let file = write_config(FULL);
        let config = Config::load(Some(file.path())).unwrap();

        assert_eq!(config.slack_bot_token, "xoxb-test");
        assert_eq!(config.agent_endpoint, "http://localhost:8000");
        assert_eq!(config.agent_timeout, Duration::from_secs(120));
        assert_eq!(config.thinking_message, messages::THINKING_MESSAGE);
        assert_eq!(config.prompt_message, messages::PROMPT_MESSAGE);
    }

    #[test]
    fn test_load_reads_timeout_seconds() {
        let file = write_config(&format!("{FULL}\nagent_timeout = 30\n"));
        let config = Config::load(Some(file.path())).unwrap();

        assert_eq!(config.agent_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_missing_secret_names_the_variable() {
        let file = write_config(
            r#"
            slack_bot_token = "xoxb-test"
            agent_api_key = "secret"
            agent_endpoint = "http://localhost:8000"
        "#,
        );

        let err = Config::load(Some(file.path())).unwrap_err().to_string();

        assert!(err.contains("ASKDB_BOT_SLACK_APP_TOKEN"), "{err}");
    }

    #[test]
    fn test_blank_secret_is_missing() {
        let file = write_config(&FULL.replace("\"secret\"", "\"  \""));
        let err = Config::load(Some(file.path())).unwrap_err().to_string();

        assert!(err.contains("ASKDB_BOT_AGENT_API_KEY"), "{err}");
    }

    #[test]
    fn test_endpoint_must_be_http() {
        let file = write_config(&FULL.replace("http://localhost:8000", "postgres://db/prod"));

        assert!(Config::load(Some(file.path())).is_err());
    }

    #[test]
    fn test_timeout_out_of_range() {
        let file = write_config(&format!("{FULL}\nagent_timeout = 0\n"));

        assert!(Config::load(Some(file.path())).is_err());
    }
}
