//! Client-side predicates applied to every fetched message.

use chrono::{DateTime, Utc};

use super::types::Author;

/// Predicates for one retrieval session. Read-only once built.
///
/// Keyword and author entries are stored trimmed, lower-cased and
/// de-duplicated. Within a category any entry may match; across categories
/// every configured category must match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    since: Option<DateTime<Utc>>,
    until: Option<DateTime<Utc>>,
    keywords: Vec<String>,
    authors: Vec<String>,
    include_bots: bool,
    max_messages: Option<usize>,
}

impl FilterSet {
    /// Unconstrained filter set: every non-bot, non-empty message passes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop messages older than `since`.
    pub fn since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    /// Drop messages newer than `until`.
    pub fn until(mut self, until: DateTime<Utc>) -> Self {
        self.until = Some(until);
        self
    }

    /// Set both window bounds at once; `None` leaves a side open.
    pub fn window(mut self, since: Option<DateTime<Utc>>, until: Option<DateTime<Utc>>) -> Self {
        self.since = since;
        self.until = until;
        self
    }

    pub fn keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.keywords = normalize_terms(keywords);
        self
    }

    pub fn authors<I, S>(mut self, authors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.authors = normalize_terms(authors);
        self
    }

    pub fn include_bots(mut self, include: bool) -> Self {
        self.include_bots = include;
        self
    }

    /// Stop after `max` accepted messages. Zero means unlimited.
    pub fn max_messages(mut self, max: usize) -> Self {
        self.max_messages = if max == 0 { None } else { Some(max) };
        self
    }

    pub fn since_bound(&self) -> Option<DateTime<Utc>> {
        self.since
    }

    pub fn until_bound(&self) -> Option<DateTime<Utc>> {
        self.until
    }

    pub fn keyword_terms(&self) -> &[String] {
        &self.keywords
    }

    pub fn author_terms(&self) -> &[String] {
        &self.authors
    }

    pub fn includes_bots(&self) -> bool {
        self.include_bots
    }

    pub fn cap(&self) -> Option<usize> {
        self.max_messages
    }

    /// True once `accepted` messages satisfy the result cap.
    pub fn cap_reached(&self, accepted: usize) -> bool {
        self.max_messages.is_some_and(|max| accepted >= max)
    }

    pub fn is_after_window(&self, timestamp: DateTime<Utc>) -> bool {
        self.until.is_some_and(|until| timestamp > until)
    }

    pub fn is_before_window(&self, timestamp: DateTime<Utc>) -> bool {
        self.since.is_some_and(|since| timestamp < since)
    }

    /// Case-insensitive substring match against any keyword.
    pub fn matches_keywords(&self, content: &str) -> bool {
        if self.keywords.is_empty() {
            return true;
        }
        let text = content.to_lowercase();
        self.keywords.iter().any(|kw| text.contains(kw.as_str()))
    }

    /// Case-insensitive equality against username, display name or id.
    pub fn matches_author(&self, author: &Author) -> bool {
        if self.authors.is_empty() {
            return true;
        }
        let username = author.username.to_lowercase();
        let display = author
            .display_name
            .as_deref()
            .map(str::to_lowercase)
            .unwrap_or_default();
        let id = author.id.to_lowercase();

        self.authors
            .iter()
            .any(|a| *a == username || (!display.is_empty() && *a == display) || *a == id)
    }
}

/// Trim, lower-case and de-duplicate filter terms, dropping blanks.
pub fn normalize_terms<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut terms: Vec<String> = Vec::new();
    for value in values {
        let term = value.as_ref().trim().to_lowercase();
        if !term.is_empty() && !terms.contains(&term) {
            terms.push(term);
        }
    }
    terms
}
