//! The placeholder / answer / update cycle for a single question.

use std::{any::Any, panic::AssertUnwindSafe, time::Duration};

use futures::FutureExt;
use tokio::time::{Instant, timeout};
use tracing::{Instrument, error, info, instrument};

use crate::{
    base::{
        config::Config,
        messages::{ELAPSED_LABEL, ERROR_MARKER},
        types::{Conversation, QueryOutcome, Res},
    },
    service::{
        agent::{AgentError, QueryAgent},
        chat::ChatClient,
    },
};

/// Handles a classified query.
///
/// Spawns a new task so that the listener can keep receiving events while the
/// agent works.
#[instrument(skip_all)]
pub fn handle_query(query: String, conversation: Conversation, config: Config, chat: ChatClient, agent: QueryAgent) {
    tokio::spawn(async move {
        // Process the query.
        let result = process_query(&query, &conversation, &config, &chat, &agent).in_current_span().await;

        // Log the outcome.
        match result {
            Ok(outcome) => info!("Query finished: {:?}", outcome),
            Err(err) => error!("Error while handling: {}", err),
        }
    });
}

/// Runs one query cycle to completion.
///
/// Posts the placeholder, asks the agent, then overwrites the placeholder with
/// either the answer or an error summary. Agent failures never escape this
/// function; only failures of the chat client itself are returned.
#[instrument(skip_all, fields(channel = %conversation.channel))]
pub async fn process_query(query: &str, conversation: &Conversation, config: &Config, chat: &ChatClient, agent: &QueryAgent) -> Res<QueryOutcome> {
    if query.trim().is_empty() {
        return Ok(QueryOutcome::Ignored);
    }

    let started = Instant::now();

    // The user gets feedback before the agent is even called.
    let placeholder = chat.say(conversation, &config.thinking_message).await?;

    let result = run_agent(agent, query, config.agent_timeout).await;
    let elapsed = started.elapsed();

    let (text, outcome) = match result {
        Ok(answer) => (format_answer(&answer, elapsed), QueryOutcome::Answered),
        Err(err) => {
            error!("Query agent failed after {:.2}s: {:#}", elapsed.as_secs_f64(), err);
            (format_error(&err.to_string(), elapsed), QueryOutcome::Errored)
        }
    };

    chat.update(&placeholder, &text).await?;

    Ok(outcome)
}

/// Calls the agent, folding timeouts and panics into ordinary errors.
async fn run_agent(agent: &QueryAgent, query: &str, limit: Duration) -> Res<String> {
    let call = AssertUnwindSafe(agent.run(query)).catch_unwind();

    match timeout(limit, call).await {
        Err(_) => Err(AgentError::Timeout(limit).into()),
        Ok(Err(panic)) => Err(AgentError::Panicked(panic_message(panic.as_ref())).into()),
        Ok(Ok(result)) => result,
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

// Formatting.

fn elapsed_footer(elapsed: Duration) -> String {
    format!("\n\n{} {:.2}s", ELAPSED_LABEL, elapsed.as_secs_f64())
}

/// Final text for a successful answer.
pub fn format_answer(answer: &str, elapsed: Duration) -> String {
    format!("{}{}", answer, elapsed_footer(elapsed))
}

/// Final text for a failed query.
pub fn format_error(message: &str, elapsed: Duration) -> String {
    format!("{} {}{}", ERROR_MARKER, message, elapsed_footer(elapsed))
}

// Tests.
