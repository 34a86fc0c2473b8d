//! Common types shared across the bot.

/// Error type used throughout the crate.
pub type Err = anyhow::Error;
/// Result alias over [`Err`].
pub type Res<T> = Result<T, Err>;
/// Result with no value.
pub type Void = Res<()>;

/// The kind of platform event an [`InboundEvent`] was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// The user explicitly addressed the bot (e.g., `app_mention`).
    Mention,
    /// A plain message in a channel the bot is a member of.
    Message,
}

/// A platform-agnostic view of a delivered chat event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    /// Which platform event this came from.
    pub kind: EventKind,
    /// Channel the event was posted in.
    pub source_channel: String,
    /// User who posted it, when known.
    pub author: Option<String>,
    /// Message text as delivered, mention markup included.
    pub raw_text: String,
    /// Platform subtype (edits, deletes, joins, ...).
    pub subtype: Option<String>,
    /// Whether a bot (possibly this one) sent it.
    pub is_bot_origin: bool,
    /// Platform timestamp identifying the message.
    pub ts: String,
    /// Root of the thread the message was posted in, if any.
    pub thread_ts: Option<String>,
}

impl InboundEvent {
    /// The conversation that replies to this event should land in.
    pub fn conversation(&self) -> Conversation {
        Conversation {
            channel: self.source_channel.clone(),
            thread_ts: self.thread_ts.clone(),
        }
    }
}

/// Where a reply goes: a channel, and optionally a thread within it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    /// Channel to post in.
    pub channel: String,
    /// Thread to post in, if any.
    pub thread_ts: Option<String>,
}

/// Handle to a message the bot has posted, used to overwrite it later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderMessage {
    /// Channel the message lives in.
    pub channel: String,
    /// Platform timestamp of the message.
    pub ts: String,
}

/// Why the filter decided not to answer an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Sent by a bot.
    BotOrigin,
    /// Edit, delete, or other non-plain message.
    Subtype,
    /// Nothing left after stripping the mention.
    EmptyText,
}

/// Result of running an [`InboundEvent`] through the event filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// A user query to answer, with any mention marker stripped.
    Query(String),
    /// The bot was mentioned without a question; ask the user for one.
    PromptForInput,
    /// Nothing to do.
    Skip(SkipReason),
}

/// Terminal state of a single query cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    /// Input was empty; no placeholder was sent.
    Ignored,
    /// The placeholder now holds the answer.
    Answered,
    /// The placeholder now holds an error summary.
    Errored,
}
