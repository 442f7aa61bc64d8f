//! ripcord library
//!
//! Retrieves the message history of a Discord channel through the paginated,
//! rate-limited REST API, filters and normalizes it, and exports the result.

pub mod cli;
pub mod config;
pub mod discord;
pub mod export;
pub mod interrupt;
pub mod token;
pub mod window;

pub use config::Config;
pub use discord::{CancelToken, DiscordClient, FilterSet, Message, Retrieval, Retriever};
pub use export::{Export, OutputFormat};
pub use window::TimeWindow;
