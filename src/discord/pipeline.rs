//! Per-page filter and normalization pass.
//!
//! Pages arrive newest-first, so once a message falls before the window's
//! lower bound nothing later in the page, or in any later page, can match.

use std::collections::HashSet;

use tracing::trace;

use super::filter::FilterSet;
use super::normalize::{normalize_message, parse_timestamp};
use super::types::{Message, RawMessage};

/// What the driver should do after a page has been processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageVerdict {
    /// Keep paginating.
    Continue,
    /// A message older than the window was seen; stop after this page.
    WindowExhausted,
    /// The result cap was reached; stop immediately.
    CapReached,
}

impl PageVerdict {
    pub fn should_stop(self) -> bool {
        !matches!(self, PageVerdict::Continue)
    }
}

/// Accumulates accepted messages across pages in discovery order.
#[derive(Debug, Default)]
pub struct PagePipeline {
    accepted: Vec<Message>,
    seen: HashSet<String>,
}

impl PagePipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of messages accepted so far.
    pub fn accepted_count(&self) -> usize {
        self.accepted.len()
    }

    /// Accepted messages, newest first.
    pub fn accepted(&self) -> &[Message] {
        &self.accepted
    }

    /// Consume the pipeline, returning messages oldest first.
    pub fn into_chronological(self) -> Vec<Message> {
        let mut messages = self.accepted;
        messages.reverse();
        messages
    }

    /// Run every message of `page` through the predicate chain.
    pub fn process_page(&mut self, page: &[RawMessage], filters: &FilterSet) -> PageVerdict {
        for raw in page {
            if raw.author.bot && !filters.includes_bots() {
                continue;
            }

            let Some(timestamp) = parse_timestamp(&raw.timestamp) else {
                trace!(id = %raw.id, timestamp = %raw.timestamp, "skipping unparseable timestamp");
                continue;
            };

            if filters.is_after_window(timestamp) {
                continue;
            }
            if filters.is_before_window(timestamp) {
                return PageVerdict::WindowExhausted;
            }

            let message = normalize_message(raw, timestamp);

            if !filters.matches_author(&message.author) {
                continue;
            }
            if !filters.matches_keywords(&message.content) {
                continue;
            }
            if message.is_empty() {
                continue;
            }
            if !self.seen.insert(message.id.clone()) {
                continue;
            }

            self.accepted.push(message);
            if filters.cap_reached(self.accepted.len()) {
                return PageVerdict::CapReached;
            }
        }
        PageVerdict::Continue
    }
}
