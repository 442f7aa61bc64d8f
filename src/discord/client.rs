//! Discord REST client: one page request with throttling and retries.

use tracing::{debug, warn};

use super::cancel::CancelToken;
use super::error::FetchError;
use super::limiter::RateLimiter;
use super::retry::RetryPolicy;
use super::transport::{HttpRequest, HttpTransport};
use super::types::{RawMessage, RetrievalMetrics};

/// Default REST API root.
pub const DEFAULT_API_BASE: &str = "https://discord.com/api/v10";

/// Largest page the messages endpoint will return.
pub const MAX_PAGE_SIZE: u8 = 100;

/// Default requests-per-second ceiling.
pub const DEFAULT_RATE_LIMIT: f64 = 2.0;

/// Outcome of fetching one page, after retries.
#[derive(Debug)]
pub enum PageOutcome {
    /// A non-empty page, newest message first.
    Page(Vec<RawMessage>),
    /// The API returned an empty array: there is no older history.
    EndOfHistory,
    /// A fatal error; retrieval cannot continue.
    Failed(FetchError),
    /// The session was cancelled before or while waiting for a retry.
    Cancelled,
}

/// Settings for a [`DiscordClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub base_url: String,
    pub user_agent: String,
    pub requests_per_second: f64,
    pub retry: RetryPolicy,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            user_agent: default_user_agent(),
            requests_per_second: DEFAULT_RATE_LIMIT,
            retry: RetryPolicy::default(),
        }
    }
}

pub fn default_user_agent() -> String {
    format!("ripcord/{}", env!("CARGO_PKG_VERSION"))
}

/// Client for the channel messages endpoint.
///
/// Owns the credential and the throttling state for one session.
pub struct DiscordClient {
    transport: Box<dyn HttpTransport>,
    token: String,
    base_url: String,
    user_agent: String,
    limiter: RateLimiter,
    policy: RetryPolicy,
    cancel: CancelToken,
}

impl DiscordClient {
    pub fn new(transport: Box<dyn HttpTransport>, token: impl Into<String>) -> Self {
        Self::with_options(transport, token, ClientOptions::default())
    }

    pub fn with_options(
        transport: Box<dyn HttpTransport>,
        token: impl Into<String>,
        options: ClientOptions,
    ) -> Self {
        Self {
            transport,
            token: token.into(),
            base_url: options.base_url.trim_end_matches('/').to_string(),
            user_agent: options.user_agent,
            limiter: RateLimiter::new(options.requests_per_second),
            policy: options.retry,
            cancel: CancelToken::new(),
        }
    }

    /// Abort throttling and retry waits once `cancel` is set.
    pub fn set_cancel_token(&mut self, cancel: CancelToken) {
        self.cancel = cancel;
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    fn page_request(&self, channel_id: &str, before: Option<&str>, limit: u8) -> HttpRequest {
        let url = format!("{}/channels/{}/messages", self.base_url, channel_id);
        let mut request = HttpRequest::get(url).query("limit", limit.to_string());
        if let Some(cursor) = before {
            request = request.query("before", cursor);
        }
        request
            .header("Authorization", self.token.as_str())
            .header("User-Agent", self.user_agent.as_str())
    }

    /// Fetch one page of messages older than `before` (newest first).
    ///
    /// Every received response is counted in `metrics`, including 429s and
    /// error statuses. Transient failures are retried here; only fatal
    /// conditions are returned as [`PageOutcome::Failed`]. A cancel request
    /// interrupts any wait and yields [`PageOutcome::Cancelled`].
    pub fn fetch_page(
        &mut self,
        channel_id: &str,
        before: Option<&str>,
        limit: u8,
        metrics: &mut RetrievalMetrics,
    ) -> PageOutcome {
        let request = self.page_request(channel_id, before, limit.clamp(1, MAX_PAGE_SIZE));
        let mut last_error: Option<FetchError> = None;

        let mut attempt = 0;
        while self.policy.should_retry(attempt) {
            if !self.cancel.sleep(self.limiter.pending_wait()) {
                return PageOutcome::Cancelled;
            }
            self.limiter.throttle();
            debug!(channel_id, before, attempt, "requesting message page");

            let response = match self.transport.get(&request) {
                Ok(response) => response,
                Err(err) => {
                    let wait = self.policy.delay_for_attempt(attempt);
                    warn!(error = %err, ?wait, "transport failure, backing off");
                    last_error = Some(err.into());
                    if !self.cancel.sleep(wait) {
                        return PageOutcome::Cancelled;
                    }
                    attempt += 1;
                    continue;
                }
            };

            metrics.record_request();

            match response.status {
                200 => {
                    return match serde_json::from_str::<Vec<RawMessage>>(&response.body) {
                        Ok(page) if page.is_empty() => PageOutcome::EndOfHistory,
                        Ok(page) => PageOutcome::Page(page),
                        Err(err) => PageOutcome::Failed(FetchError::Decode(err)),
                    };
                }
                429 => {
                    metrics.record_rate_limit();
                    let wait = self.policy.rate_limit_wait(&response.body);
                    warn!(?wait, "rate limited by Discord");
                    if !self.cancel.sleep(wait) {
                        return PageOutcome::Cancelled;
                    }
                }
                status if status >= 500 => {
                    let wait = self.policy.delay_for_attempt(attempt);
                    warn!(status, ?wait, "server error, backing off");
                    last_error = Some(FetchError::ServerError { status });
                    if !self.cancel.sleep(wait) {
                        return PageOutcome::Cancelled;
                    }
                }
                status => {
                    return PageOutcome::Failed(FetchError::Rejected {
                        status,
                        body: response.body,
                    });
                }
            }
            attempt += 1;
        }

        PageOutcome::Failed(last_error.unwrap_or(FetchError::RetriesExhausted {
            attempts: self.policy.max_attempts,
        }))
    }
}
