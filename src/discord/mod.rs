//! Channel history retrieval against the Discord REST API.
//!
//! A retrieval session walks a channel's history backward from the newest
//! message, one page at a time, and runs every page through a normalize and
//! filter pass before accumulating the survivors.
//!
//! # Module Structure
//!
//! - [`limiter`] - Minimum spacing between outgoing requests
//! - [`transport`] - HTTP seam and the reqwest-backed implementation
//! - [`retry`] - Backoff and rate-limit wait computation
//! - [`client`] - Single-page fetch with retry handling
//! - [`filter`] - Client-side predicates
//! - [`normalize`] - Wire message to canonical record conversion
//! - [`pipeline`] - Per-page predicate chain and accumulation
//! - [`retriever`] - Pagination driver
//! - [`cancel`] - Cancellation flag and interruptible waits
//! - [`progress`] - Stderr progress reporting

pub mod cancel;
pub mod client;
pub mod error;
pub mod filter;
pub mod limiter;
pub mod normalize;
pub mod pipeline;
pub mod progress;
pub mod retriever;
pub mod retry;
pub mod transport;
pub mod types;

pub use client::{ClientOptions, DiscordClient, PageOutcome, DEFAULT_API_BASE, MAX_PAGE_SIZE};
pub use error::{FetchError, RetrievalError, TransportError};
pub use filter::FilterSet;
pub use limiter::RateLimiter;
pub use progress::ProgressReporter;
pub use cancel::CancelToken;
pub use retriever::{Retrieval, Retriever};
pub use retry::RetryPolicy;
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
pub use types::{Attachment, Author, Message, Reaction, ReplyReference, RetrievalMetrics};
