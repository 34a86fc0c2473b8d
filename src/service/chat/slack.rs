//! Chat service integration for Slack.
//!
//! This module provides the socket-mode Slack implementation of `GenericChatClient`:
//! - Receiving `message` and `app_mention` push events
//! - Converting them into platform-agnostic `InboundEvent`s
//! - Posting placeholders and updating them in place

use crate::{
    base::{
        config::Config,
        types::{Conversation, EventKind, InboundEvent, PlaceholderMessage, Res, Void},
    },
    interaction,
    service::agent::QueryAgent,
};
use async_trait::async_trait;
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::connect::HttpConnector;
use slack_morphism::prelude::*;
use tracing::{debug, info, instrument, warn};

use std::sync::Arc;

use super::{ChatClient, GenericChatClient};

// Type aliases.

type FullClient = slack_morphism::SlackClient<SlackClientHyperConnector<HttpsConnector<HttpConnector>>>;

// Extra methods on `ChatClient` applied by the slack implementation.

impl ChatClient {
    /// Creates a new Slack chat client.
    pub async fn slack(config: &Config, agent: QueryAgent) -> Res<Self> {
        let client = SlackChatClient::new(config, agent).await?;
        Ok(Self { inner: Arc::new(client) })
    }
}

impl From<SlackChatClient> for ChatClient {
    fn from(client: SlackChatClient) -> Self {
        Self { inner: Arc::new(client) }
    }
}

// Structs.

/// User state for the slack socket client.
struct SlackUserState {
    config: Config,
    agent: QueryAgent,
    chat: ChatClient,
}

/// Slack client implementation.
#[derive(Clone)]
struct SlackChatClient {
    pub config: Config,
    pub app_token: SlackApiToken,
    pub bot_token: SlackApiToken,
    pub bot_user_id: String,
    pub client: Arc<FullClient>,
    pub agent: QueryAgent,
}

impl SlackChatClient {
    /// Create a new Slack chat client.
    #[instrument(name = "SlackChatClient::new", skip_all)]
    pub async fn new(config: &Config, agent: QueryAgent) -> Res<Self> {
        // Initialize tokens.

        let app_token = SlackApiToken::new(SlackApiTokenValue(config.slack_app_token.clone()));
        let bot_token = SlackApiToken::new(SlackApiTokenValue(config.slack_bot_token.clone()));

        // Initialize the Slack client.

        let https_connector = HttpsConnector::<HttpConnector>::builder().with_native_roots()?.https_only().enable_all_versions().build();
        let connector = SlackClientHyperConnector::with_connector(https_connector);
        let client = Arc::new(slack_morphism::SlackClient::new(connector));

        // Get the bot's user ID.

        let session = client.open_session(&bot_token);
        let bot_user = session.auth_test().await.map_err(|e| anyhow::anyhow!("Failed to authenticate with Slack: {}", e))?;
        let bot_user_id = bot_user.user_id.0;

        info!("Slack bot user ID: {}", bot_user_id);

        Ok(Self {
            config: config.clone(),
            app_token,
            bot_token,
            bot_user_id,
            client,
            agent,
        })
    }
}

#[async_trait]
impl GenericChatClient for SlackChatClient {
    fn bot_user_id(&self) -> &str {
        &self.bot_user_id
    }

    async fn start(&self) -> Void {
        // Initialize the socket mode listener.

        let socket_mode_callbacks = SlackSocketModeListenerCallbacks::new().with_push_events(handle_push_event);

        // Initialize the socket mode listener environment.

        let listener_environment = Arc::new(SlackClientEventsListenerEnvironment::new(self.client.clone()).with_user_state(SlackUserState {
            config: self.config.clone(),
            agent: self.agent.clone(),
            chat: ChatClient::from(self.clone()),
        }));

        let socket_mode_listener = Arc::new(SlackClientSocketModeListener::new(
            &SlackClientSocketModeConfig::new(),
            listener_environment.clone(),
            socket_mode_callbacks,
        ));

        // Register the app token to listen for events.
        socket_mode_listener.listen_for(&self.app_token).await?;

        info!("Listening for Slack events ...");

        // Serve until Ctrl-C.
        socket_mode_listener.serve().await;

        Ok(())
    }

    #[instrument(skip(self, text))]
    async fn say(&self, conversation: &Conversation, text: &str) -> Res<PlaceholderMessage> {
        let message = SlackMessageContent::new().with_text(text.to_string());

        let request = SlackApiChatPostMessageRequest::new(SlackChannelId(conversation.channel.clone()), message)
            .opt_thread_ts(conversation.thread_ts.clone().map(SlackTs));

        let session = self.client.open_session(&self.bot_token);

        let response = session.chat_post_message(&request).await.map_err(|e| anyhow::anyhow!("Failed to send message: {}", e))?;

        Ok(PlaceholderMessage {
            channel: response.channel.0,
            ts: response.ts.0,
        })
    }

    #[instrument(skip(self, text))]
    async fn update(&self, message: &PlaceholderMessage, text: &str) -> Void {
        let content = SlackMessageContent::new().with_text(text.to_string());

        let request = SlackApiChatUpdateRequest::new(SlackChannelId(message.channel.clone()), content, SlackTs(message.ts.clone()));

        let session = self.client.open_session(&self.bot_token);

        session.chat_update(&request).await.map_err(|e| anyhow::anyhow!("Failed to update message: {}", e))?;

        Ok(())
    }
}

// Event conversion.

/// Whether the text contains the bot's own mention token.
fn mentions_bot(text: &str, bot_user_id: &str) -> bool {
    text.contains(&format!("<@{bot_user_id}>"))
}

/// Whether a `message` event is the copy of a channel mention that Slack also
/// delivers as `app_mention`. Direct messages never get an `app_mention`.
fn is_mention_echo(event: &SlackMessageEvent, bot_user_id: &str) -> bool {
    let is_im = event.origin.channel_type.as_ref().is_some_and(|t| t.0 == "im");
    let text = event.content.as_ref().and_then(|c| c.text.as_deref()).unwrap_or_default();

    !is_im && mentions_bot(text, bot_user_id)
}

/// Converts a Slack `message` event; `None` when it carries no channel.
fn inbound_from_message(event: &SlackMessageEvent, bot_user_id: &str) -> Option<InboundEvent> {
    let channel = event.origin.channel.as_ref()?.0.clone();
    let author = event.sender.user.as_ref().map(|u| u.0.clone());
    let is_bot_origin = event.sender.bot_id.is_some() || author.as_deref() == Some(bot_user_id);

    let subtype = event
        .subtype
        .as_ref()
        .and_then(|s| serde_json::to_value(s).ok())
        .and_then(|v| v.as_str().map(str::to_string));

    Some(InboundEvent {
        kind: EventKind::Message,
        source_channel: channel,
        author,
        raw_text: event.content.as_ref().and_then(|c| c.text.clone()).unwrap_or_default(),
        subtype,
        is_bot_origin,
        ts: event.origin.ts.0.clone(),
        thread_ts: event.origin.thread_ts.as_ref().map(|t| t.0.clone()),
    })
}

/// Converts a Slack `app_mention` event.
fn inbound_from_app_mention(event: &SlackAppMentionEvent, bot_user_id: &str) -> InboundEvent {
    InboundEvent {
        kind: EventKind::Mention,
        source_channel: event.channel.0.clone(),
        author: Some(event.user.0.clone()),
        raw_text: event.content.text.clone().unwrap_or_default(),
        subtype: None,
        is_bot_origin: event.user.0 == bot_user_id,
        ts: event.origin.ts.0.clone(),
        thread_ts: event.origin.thread_ts.as_ref().map(|t| t.0.clone()),
    }
}

/// Converts a push event into an `InboundEvent`, or `None` when it should be ignored.
fn inbound_from_push_event(event: SlackEventCallbackBody, chat: &ChatClient) -> Option<InboundEvent> {
    let bot_user_id = chat.bot_user_id();

    match event {
        SlackEventCallbackBody::Message(slack_message_event) => {
            debug!("Received message event ...");

            if is_mention_echo(&slack_message_event, bot_user_id) {
                debug!("Skipping message event because it mentions the bot.");
                return None;
            }

            let inbound = inbound_from_message(&slack_message_event, bot_user_id);
            if inbound.is_none() {
                warn!("Skipping message event without a channel.");
            }

            inbound
        }
        SlackEventCallbackBody::AppMention(slack_app_mention_event) => {
            debug!("Received app mention event ...");
            Some(inbound_from_app_mention(&slack_app_mention_event, bot_user_id))
        }
        _ => {
            warn!("Received unhandled push event.");
            None
        }
    }
}

// Socket mode listener callbacks for Slack.

/// Handles push events from Slack.
#[instrument(skip_all)]
async fn handle_push_event(event_callback: SlackPushEventCallback, _client: Arc<SlackHyperClient>, states: SlackClientEventsUserState) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let event = event_callback.event;
    let states = states.read().await;
    let user_state = states.get_user_state::<SlackUserState>().ok_or(anyhow::anyhow!("Failed to get user state"))?;

    let Some(inbound) = inbound_from_push_event(event, &user_state.chat) else {
        return Ok(());
    };

    interaction::inbound::handle_inbound_event(inbound, user_state.config.clone(), user_state.chat.clone(), user_state.agent.clone());

    Ok(())
}

// Tests.
