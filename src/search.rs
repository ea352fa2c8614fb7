use crate::news::{Article, filter_displayable};
use anyhow::Result;
use std::time::Duration;
use tokio::time::Instant;

/// User-facing message for the single fetch-failure error kind.
pub const FETCH_FAILED_MSG: &str = "Failed to fetch news. Check your connection.";

/// Everything the presentation layer renders from.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub query: String,
    pub loading: bool,
    pub error: Option<String>,
    pub articles: Vec<Article>,
    /// Cursor into `articles`, reset whenever a new list arrives.
    pub selected: usize,
}

/// A fetch the controller has decided to issue. `seq` tags the request so a
/// slow response that has been superseded can be recognized and dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedFetch {
    pub seq: u64,
    pub query: String,
}

/// Owns the search state, the debounce deadline, and the fetch sequence
/// counter. Purely synchronous; the session loop drives it from key events,
/// timer expiry, and fetch completions.
pub struct SearchController {
    state: SearchState,
    debounce: Duration,
    default_query: String,
    deadline: Option<Instant>,
    latest_seq: u64,
}

impl SearchController {
    pub fn new(default_query: String, debounce: Duration) -> Self {
        Self {
            state: SearchState::default(),
            debounce,
            default_query,
            deadline: None,
            latest_seq: 0,
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// The armed debounce deadline, if any edit is awaiting its quiet period.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn push_char(&mut self, c: char) {
        self.state.query.push(c);
        self.note_edit();
    }

    pub fn pop_char(&mut self) {
        self.state.query.pop();
        self.note_edit();
    }

    // Arm (or re-arm) the single debounce deadline. An edit back to empty
    // disarms it entirely; an empty query never fetches.
    fn note_edit(&mut self) {
        if self.state.query.is_empty() {
            self.deadline = None;
        } else {
            self.deadline = Some(Instant::now() + self.debounce);
        }
    }

    /// Issue a fetch for the current query (the built-in default when the
    /// query is still empty, as on the startup fetch). Disarms the deadline,
    /// flags loading, and hands back the tagged request to run.
    pub fn begin_fetch(&mut self) -> IssuedFetch {
        self.deadline = None;
        self.latest_seq += 1;
        self.state.loading = true;
        self.state.error = None;
        let query = if self.state.query.is_empty() {
            self.default_query.clone()
        } else {
            self.state.query.clone()
        };
        IssuedFetch {
            seq: self.latest_seq,
            query,
        }
    }

    /// Fold a fetch completion into the state. Returns false (and changes
    /// nothing) when `seq` is not the most recently issued request; a newer
    /// fetch has superseded it.
    ///
    /// On failure the previous articles stay put: stale-but-valid results
    /// beat a blanked screen while the error banner is up.
    pub fn apply_result(&mut self, seq: u64, result: Result<Vec<Article>>) -> bool {
        if seq != self.latest_seq {
            return false;
        }
        self.state.loading = false;
        match result {
            Ok(articles) => {
                // Re-filtering is idempotent on the HTTP source's output and
                // keeps the display invariant for any other NewsSource.
                self.state.articles = filter_displayable(articles);
                self.state.error = None;
                self.state.selected = 0;
            }
            Err(_) => {
                self.state.error = Some(FETCH_FAILED_MSG.to_string());
            }
        }
        true
    }

    pub fn select_prev(&mut self) {
        self.state.selected = self.state.selected.saturating_sub(1);
    }

    pub fn select_next(&mut self) {
        if !self.state.articles.is_empty() {
            self.state.selected = (self.state.selected + 1).min(self.state.articles.len() - 1);
        }
    }

    pub fn selected_article(&self) -> Option<&Article> {
        self.state.articles.get(self.state.selected)
    }
}
