//! Progress reporting for a retrieval session.
//!
//! Purely observational: nothing here feeds back into pagination.

use std::io::{self, Write};

use super::types::RetrievalMetrics;

/// Progress reporter that writes a running count to stderr.
#[derive(Debug)]
pub struct ProgressReporter {
    /// Pages processed so far
    pages: usize,
    /// Whether to show output (disabled in quiet mode)
    show_output: bool,
}

impl ProgressReporter {
    /// Create a reporter that prints progress.
    pub fn new() -> Self {
        Self {
            pages: 0,
            show_output: true,
        }
    }

    /// Create a reporter with output disabled.
    pub fn quiet() -> Self {
        Self {
            show_output: false,
            ..Self::new()
        }
    }

    /// Whether this reporter prints anything.
    pub fn is_quiet(&self) -> bool {
        !self.show_output
    }

    /// Pages reported so far.
    pub fn pages(&self) -> usize {
        self.pages
    }

    /// Report that a page has been processed.
    pub fn page_completed(&mut self, accepted_so_far: usize) {
        self.pages += 1;

        if self.show_output {
            eprint!("\rpulled {} messages so far", accepted_so_far);
            let _ = io::stderr().flush();
        }
    }

    /// Report the end of the session.
    pub fn finish(&self, accepted: usize, metrics: &RetrievalMetrics) {
        if self.show_output {
            eprintln!("{}", summary_line(self.pages, accepted, metrics));
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

fn summary_line(pages: usize, accepted: usize, metrics: &RetrievalMetrics) -> String {
    // The leading \r plus padding clears the running count.
    let clear = if pages > 0 {
        "\r                                                    \r"
    } else {
        ""
    };
    let waits = if metrics.rate_limit_hits > 0 {
        format!(
            ", {} rate limit wait{}",
            metrics.rate_limit_hits,
            plural(metrics.rate_limit_hits)
        )
    } else {
        String::new()
    };
    format!(
        "{}Retrieved {} message{} from {} page{} ({} API request{}{})",
        clear,
        accepted,
        plural(accepted as u64),
        pages,
        plural(pages as u64),
        metrics.requests,
        plural(metrics.requests),
        waits
    )
}

fn plural(n: u64) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}
