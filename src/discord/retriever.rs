//! Pagination driver: walks a channel's history backward, page by page.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use super::cancel::CancelToken;
use super::client::{DiscordClient, PageOutcome, MAX_PAGE_SIZE};
use super::error::RetrievalError;
use super::filter::FilterSet;
use super::pipeline::{PagePipeline, PageVerdict};
use super::progress::ProgressReporter;
use super::types::{Message, RetrievalMetrics};

/// Result of a completed (or cancelled) retrieval session.
#[derive(Debug, Clone, PartialEq)]
pub struct Retrieval {
    /// Accepted messages, oldest first.
    pub messages: Vec<Message>,
    pub metrics: RetrievalMetrics,
    /// True when the session stopped early because of a cancel request.
    pub cancelled: bool,
}

/// Why the pagination loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopReason {
    EndOfHistory,
    WindowExhausted,
    CapReached,
    EmptyPage,
    StalledCursor,
    Cancelled,
}

/// Drives one retrieval session over a [`DiscordClient`].
pub struct Retriever {
    client: DiscordClient,
    page_size: u8,
    progress: ProgressReporter,
    cancel: CancelToken,
}

impl Retriever {
    pub fn new(client: DiscordClient) -> Self {
        Self {
            client,
            page_size: MAX_PAGE_SIZE,
            progress: ProgressReporter::quiet(),
            cancel: CancelToken::new(),
        }
    }

    /// Messages requested per page (1-100).
    pub fn page_size(mut self, page_size: u8) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    pub fn progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = progress;
        self
    }

    /// Stop between pages and during throttling or retry waits once
    /// `cancel` is set.
    pub fn cancel_token(mut self, cancel: CancelToken) -> Self {
        self.client.set_cancel_token(cancel.clone());
        self.cancel = cancel;
        self
    }

    /// Retrieve every message of `channel_id` accepted by `filters`.
    ///
    /// Pages are requested newest to oldest; the returned messages are
    /// oldest first. On a fatal error the partial records and metrics
    /// travel inside the [`RetrievalError`].
    pub fn retrieve(
        &mut self,
        channel_id: &str,
        filters: &FilterSet,
    ) -> Result<Retrieval, RetrievalError> {
        let mut metrics = RetrievalMetrics::default();
        let mut pipeline = PagePipeline::new();
        let mut cursor: Option<String> = None;
        let mut sent_cursors: HashSet<String> = HashSet::new();

        let reason = loop {
            if self.cancel.is_cancelled() {
                break StopReason::Cancelled;
            }

            let page = match self.client.fetch_page(
                channel_id,
                cursor.as_deref(),
                self.page_size,
                &mut metrics,
            ) {
                PageOutcome::Page(page) => page,
                PageOutcome::EndOfHistory => break StopReason::EndOfHistory,
                PageOutcome::Cancelled => break StopReason::Cancelled,
                PageOutcome::Failed(source) => {
                    warn!(error = %source, requests = metrics.requests, "retrieval failed");
                    return Err(RetrievalError {
                        source,
                        metrics,
                        partial: pipeline.into_chronological(),
                    });
                }
            };

            let Some(oldest) = page.last() else {
                break StopReason::EmptyPage;
            };
            let next_cursor = oldest.id.clone();

            let verdict = pipeline.process_page(&page, filters);
            debug!(
                fetched = page.len(),
                accepted = pipeline.accepted_count(),
                cursor = %next_cursor,
                ?verdict,
                "processed page"
            );
            self.progress.page_completed(pipeline.accepted_count());

            match verdict {
                PageVerdict::CapReached => break StopReason::CapReached,
                PageVerdict::WindowExhausted => break StopReason::WindowExhausted,
                PageVerdict::Continue => {}
            }

            // Never request the same cursor twice.
            if !sent_cursors.insert(next_cursor.clone()) {
                warn!(cursor = %next_cursor, "page did not advance the cursor, stopping");
                break StopReason::StalledCursor;
            }
            cursor = Some(next_cursor);
        };

        info!(?reason, requests = metrics.requests, rate_limit_hits = metrics.rate_limit_hits, "retrieval finished");
        self.progress.finish(pipeline.accepted_count(), &metrics);

        Ok(Retrieval {
            messages: pipeline.into_chronological(),
            metrics,
            cancelled: reason == StopReason::Cancelled,
        })
    }
}
