//! Result accumulation with URL dedup and position assignment.
//!
//! Collects provider items across pages, dropping items with no link and
//! links already seen (compared case-insensitively), and numbers the
//! survivors `1..=N` in arrival order until the cap is reached.

use std::collections::HashSet;

use crate::types::{ProviderItem, ResultItem};

/// Ordered, capped, deduplicated result list under construction.
#[derive(Debug)]
pub struct ResultAccumulator {
    items: Vec<ResultItem>,
    seen: HashSet<String>,
    cap: usize,
}

impl ResultAccumulator {
    pub fn new(cap: usize) -> Self {
        Self {
            items: Vec::with_capacity(cap.min(100)),
            seen: HashSet::new(),
            cap,
        }
    }

    /// Offer one item. Returns `true` if it was appended.
    pub fn push(&mut self, item: ProviderItem) -> bool {
        if self.is_full() {
            return false;
        }
        let Some(link) = item.link.filter(|l| !l.trim().is_empty()) else {
            return false;
        };
        if !self.seen.insert(link.to_lowercase()) {
            tracing::trace!(url = %link, "duplicate result skipped");
            return false;
        }

        let position = self.items.len() as u32 + 1;
        self.items.push(ResultItem {
            position,
            url: link,
            title: item.title,
            snippet: item.snippet,
            display_link: item.display_link,
        });
        true
    }

    /// Offer a page of items in order, stopping once the cap is reached.
    /// Returns how many were appended.
    pub fn extend(&mut self, page: impl IntoIterator<Item = ProviderItem>) -> usize {
        let mut added = 0;
        for item in page {
            if self.is_full() {
                break;
            }
            if self.push(item) {
                added += 1;
            }
        }
        added
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.cap
    }

    /// Number of items still wanted before the cap is reached.
    pub fn remaining(&self) -> usize {
        self.cap.saturating_sub(self.items.len())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_items(self) -> Vec<ResultItem> {
        self.items
    }
}
