//! Decides whether an inbound event is a question worth answering.

use crate::base::types::{Classification, EventKind, InboundEvent, SkipReason};

/// Classify an inbound event.
///
/// Rules, in order:
/// 1. Events sent by bots, or carrying any subtype (edits, deletes, joins, ...), are skipped.
/// 2. A leading mention marker (`<@U123>`) is stripped up to the first `>`.
/// 3. Empty text is skipped for plain messages; explicit mentions get a prompt for input.
/// 4. Anything else is a query.
pub fn classify(event: &InboundEvent) -> Classification {
    if event.is_bot_origin {
        return Classification::Skip(SkipReason::BotOrigin);
    }

    if event.subtype.as_deref().is_some_and(|s| !s.is_empty()) {
        return Classification::Skip(SkipReason::Subtype);
    }

    let text = strip_mention(&event.raw_text);

    if text.is_empty() {
        return match event.kind {
            EventKind::Mention => Classification::PromptForInput,
            EventKind::Message => Classification::Skip(SkipReason::EmptyText),
        };
    }

    Classification::Query(text.to_string())
}

/// Remove a leading mention marker, returning the trimmed remainder.
///
/// Only the first `>` closes the marker; any later `>` belongs to the question.
pub fn strip_mention(raw: &str) -> &str {
    let text = raw.trim();

    if !text.starts_with("<@") {
        return text;
    }

    match text.split_once('>') {
        Some((_, rest)) => rest.trim(),
        None => text,
    }
}

// Tests.
