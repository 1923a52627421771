//! Free-text search

use std::collections::VecDeque;

use crate::deals::Deal;

/// Number of recent searches kept.
pub const RECENT_SEARCHES: usize = 5;

/// Whether a deal's title or brand contains the query, ignoring case.
pub fn matches_query(deal: &Deal, query: &str) -> bool {
    matches_folded(deal, &query.to_lowercase())
}

/// [`matches_query`] for a query that is already lower-cased.
pub(crate) fn matches_folded(deal: &Deal, folded: &str) -> bool {
    deal.title.to_lowercase().contains(folded) || deal.brand.to_lowercase().contains(folded)
}

/// Recently submitted search queries, most recent first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchHistory {
    entries: VecDeque<String>,
}

impl SearchHistory {
    /// Empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// History seeded with existing entries, most recent first.
    pub fn with_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(Into::into)
                .take(RECENT_SEARCHES)
                .collect(),
        }
    }

    /// Record a submitted query.
    ///
    /// Blank queries and queries already in the history are ignored. Returns whether
    /// the history changed.
    pub fn record(&mut self, query: &str) -> bool {
        if query.trim().is_empty() || self.entries.iter().any(|entry| entry == query) {
            return false;
        }

        self.entries.truncate(RECENT_SEARCHES - 1);
        self.entries.push_front(query.to_string());

        true
    }

    /// Forget every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries, most recent first.
    pub fn recent(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the history is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
