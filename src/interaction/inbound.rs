//! Routes classified inbound events to the right handler.

use tracing::{Instrument, debug, error, info, instrument};

use crate::{
    base::{
        config::Config,
        types::{Classification, Conversation, InboundEvent, Void},
    },
    interaction::{filter::classify, query::handle_query},
    service::{agent::QueryAgent, chat::ChatClient},
};

/// Longest query preview written to the log.
const PREVIEW_CHARS: usize = 50;

/// Handles an inbound event from the chat platform.
///
/// Returns the classification so callers can log or assert on it; any
/// resulting work runs on its own task.
#[instrument(skip_all, fields(channel = %event.source_channel, kind = ?event.kind))]
pub fn handle_inbound_event(event: InboundEvent, config: Config, chat: ChatClient, agent: QueryAgent) -> Classification {
    let classification = classify(&event);

    match &classification {
        Classification::Skip(reason) => debug!("Skipping event: {:?}", reason),
        Classification::PromptForInput => {
            info!("Mentioned without a question, prompting for input ...");
            handle_prompt(event.conversation(), config, chat);
        }
        Classification::Query(text) => {
            info!("Received query from {}: {}", event.author.as_deref().unwrap_or("unknown"), preview(text));
            handle_query(text.clone(), event.conversation(), config, chat, agent);
        }
    }

    classification
}

/// Asks the user to actually type a question.
#[instrument(skip_all)]
fn handle_prompt(conversation: Conversation, config: Config, chat: ChatClient) {
    tokio::spawn(async move {
        let result = handle_prompt_internal(&conversation, &config, &chat).in_current_span().await;

        if let Err(err) = &result {
            error!("Error while handling: {}", err);
        }
    });
}

async fn handle_prompt_internal(conversation: &Conversation, config: &Config, chat: &ChatClient) -> Void {
    chat.say(conversation, &config.prompt_message).await?;

    Ok(())
}

/// Shortens a query for logging, respecting char boundaries.
fn preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

// Tests.
