//! User-facing message text.

/// Placeholder posted while the query agent works.
pub const THINKING_MESSAGE: &str = "thinking...";

/// Reply when the bot is mentioned without a question.
pub const PROMPT_MESSAGE: &str = "Please enter a question.";

/// Marker prefixed to every error summary.
pub const ERROR_MARKER: &str = "❌ error occurred:";

/// Label for the elapsed-time footer.
pub const ELAPSED_LABEL: &str = "⏱️ elapsed:";
