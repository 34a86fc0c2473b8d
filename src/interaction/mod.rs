//! Event handling and user interactions for the bot.
//!
//! This module provides functionality for handling chat events:
//! - Filtering incoming messages and @-mentions down to real questions
//! - Running the placeholder / answer / update cycle against the query agent
//! - Coordinating responses between services (agent, chat)

pub mod filter;
pub mod inbound;
pub mod query;
