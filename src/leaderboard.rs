//! Leaderboard ranking and paging.

use std::cmp::Ordering;

use crate::bridge::ScoreKind;
use crate::store::UserRecord;

/// One row of a ranked table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub uid: String,
    pub name: String,
    pub score: u32,
}

/// Drop users without a display name, then sort by `kind` score descending
/// with ties broken by name.
pub fn rank_users(users: &[UserRecord], kind: ScoreKind) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = users
        .iter()
        .filter(|u| !u.name.trim().is_empty())
        .map(|u| LeaderboardEntry {
            uid: u.id.clone(),
            name: u.name.clone(),
            score: kind.best_of(u),
        })
        .collect();
    entries.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| compare_names(&a.name, &b.name)));
    entries
}

/// Case-insensitive first, then byte order so the result is total.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Paging over a ranked table; `page` is 1-based and `page_size == 0` means
/// everything on one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: usize,
    pub page_size: usize,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: crate::constants::LEADERBOARD_PAGE_SIZE,
        }
    }
}

impl Page {
    pub fn new(page_size: usize) -> Self {
        Self { page: 1, page_size }
    }

    pub fn page_count(&self, total: usize) -> usize {
        if self.page_size == 0 || total == 0 {
            1
        } else {
            total.div_ceil(self.page_size)
        }
    }

    pub fn displayed<'a, T>(&self, entries: &'a [T]) -> &'a [T] {
        if entries.is_empty() || self.page_size == 0 || self.page_size >= entries.len() {
            return entries;
        }
        let start = (self.page.max(1) - 1) * self.page_size;
        if start >= entries.len() {
            return &[];
        }
        let end = (start + self.page_size).min(entries.len());
        &entries[start..end]
    }

    /// 1-based overall rank of the `index`-th row on this page.
    pub fn rank_for_index(&self, index: usize) -> usize {
        if self.page_size == 0 {
            return index + 1;
        }
        (self.page.max(1) - 1) * self.page_size + index + 1
    }

    /// Advance one page, wrapping back to the first.
    pub fn next_page(&mut self, total: usize) {
        let count = self.page_count(total);
        self.page = if self.page >= count { 1 } else { self.page + 1 };
    }

    /// Cycle through "all" and the fixed size options; resets to page 1.
    pub fn cycle_size(&mut self) {
        let options = crate::constants::LEADERBOARD_PAGE_SIZE_OPTIONS;
        self.page_size = match options.iter().position(|&s| s == self.page_size) {
            None => options[0],
            Some(i) if i + 1 < options.len() => options[i + 1],
            Some(_) => 0,
        };
        self.page = 1;
    }
}
