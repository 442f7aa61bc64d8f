//! Error types for channel retrieval.
//!
//! Only fatal conditions appear here. Transient failures (network errors,
//! 5xx, 429) are absorbed by the retry loop and only surface once the
//! attempt ceiling is exhausted.

use thiserror::Error;

use super::types::{Message, RetrievalMetrics};

/// Failure of the HTTP transport itself (no response was received).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("transport error: {0}")]
    Other(String),
}

/// Fatal outcome of fetching one page.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The API answered with a non-retriable status.
    #[error("Discord API returned {status}: {}", truncate_body(body))]
    Rejected { status: u16, body: String },

    /// The API kept answering 5xx until the attempt ceiling was reached.
    #[error("Discord API error {status}")]
    ServerError { status: u16 },

    /// No response could be obtained.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A 200 response carried a body that is not a message array.
    #[error("failed to decode message page: {0}")]
    Decode(#[from] serde_json::Error),

    /// Every attempt was consumed without a concrete error (e.g. all 429s).
    #[error("maximum retries exceeded after {attempts} attempts")]
    RetriesExhausted { attempts: usize },
}

impl FetchError {
    /// True when the remote side rejected the request outright.
    pub fn is_rejected(&self) -> bool {
        matches!(self, FetchError::Rejected { .. })
    }

    /// Status code carried by this error, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Rejected { status, .. } | FetchError::ServerError { status } => {
                Some(*status)
            }
            _ => None,
        }
    }
}

/// A retrieval session that ended on a fatal error.
///
/// Carries whatever was gathered before the failure so callers can report
/// request counts or choose to surface the partial records.
#[derive(Debug, Error)]
#[error("retrieval failed after {} request(s)", metrics.requests)]
pub struct RetrievalError {
    #[source]
    pub source: FetchError,
    pub metrics: RetrievalMetrics,
    /// Records accepted before the failure, oldest first.
    pub partial: Vec<Message>,
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    let trimmed = body.trim();
    if trimmed.chars().count() <= MAX {
        trimmed.to_string()
    } else {
        let cut: String = trimmed.chars().take(MAX).collect();
        format!("{}...", cut)
    }
}
