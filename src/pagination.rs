//! Pagination engine for story listings
//!
//! Turns a flat list of story IDs into terminal-sized pages. The page size is
//! derived from the terminal height on every render, so resizing the terminal
//! re-paginates and clamps the current page into range.

use std::ops::Range;
use thiserror::Error;
use tracing::warn;

use crate::data::{HnSource, Story};

/// Rows taken by the title, table header and navigation footer
pub const RESERVED_ROWS: u16 = 8;

/// Smallest page the engine will produce
pub const MIN_STORIES_PER_PAGE: usize = 10;

/// Largest page the engine will produce
pub const MAX_STORIES_PER_PAGE: usize = 20;

/// Page size for a terminal with `rows` lines
pub fn stories_per_page_for_rows(rows: u16) -> usize {
    let available = rows.saturating_sub(RESERVED_ROWS).max(1) as usize;
    available.clamp(MIN_STORIES_PER_PAGE, MAX_STORIES_PER_PAGE)
}

/// Number of pages needed for `total_items`; never less than one
pub fn total_pages_for(total_items: usize, stories_per_page: usize) -> usize {
    total_items.div_ceil(stories_per_page.max(1)).max(1)
}

/// Errors reported for navigation commands
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PageError {
    /// A story number outside the current page was requested
    #[error("Invalid story number. Choose between 1 and {max}.")]
    InvalidSelection {
        /// Number of selectable stories on the page
        max: usize,
    },
}

/// Navigation commands accepted at the page prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavCommand {
    /// Advance one page
    Next,
    /// Go back one page
    Previous,
    /// Open the story with this 1-based number on the current page
    Select(usize),
    /// Clear the cache and reload the listing
    Refresh,
    /// Leave the listing
    Quit,
}

impl NavCommand {
    /// Parses prompt input; empty input means "next page"
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        match input.to_ascii_lowercase().as_str() {
            "" | "n" => Some(NavCommand::Next),
            "p" => Some(NavCommand::Previous),
            "r" => Some(NavCommand::Refresh),
            "q" => Some(NavCommand::Quit),
            digits if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) => {
                digits.parse().ok().map(NavCommand::Select)
            }
            _ => None,
        }
    }
}

/// Pagination state for one listing
///
/// Invariant: `1 <= current_page <= total_pages`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageState {
    /// 1-based page currently shown
    pub current_page: usize,
    /// Number of pages for the current size
    pub total_pages: usize,
    /// Stories shown on each page
    pub stories_per_page: usize,
    /// Items in the whole listing
    pub total_items: usize,
    /// Category name or search query the listing was built from
    pub label: String,
}

impl PageState {
    /// Starts on page one
    pub fn new(label: impl Into<String>, total_items: usize, stories_per_page: usize) -> Self {
        let stories_per_page = stories_per_page.max(1);
        Self {
            current_page: 1,
            total_pages: total_pages_for(total_items, stories_per_page),
            stories_per_page,
            total_items,
            label: label.into(),
        }
    }

    /// Applies a new page size; returns true when it changed
    pub fn resize(&mut self, stories_per_page: usize) -> bool {
        let stories_per_page = stories_per_page.max(1);
        if stories_per_page == self.stories_per_page {
            return false;
        }
        self.stories_per_page = stories_per_page;
        self.recompute();
        true
    }

    /// Applies a new listing length, e.g. after a refresh
    pub fn set_total_items(&mut self, total_items: usize) {
        self.total_items = total_items;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.total_pages = total_pages_for(self.total_items, self.stories_per_page);
        self.current_page = self.current_page.clamp(1, self.total_pages);
    }

    /// Advances one page; returns false on the last page
    pub fn next_page(&mut self) -> bool {
        if self.current_page < self.total_pages {
            self.current_page += 1;
            true
        } else {
            false
        }
    }

    /// Goes back one page; returns false on the first page
    pub fn previous_page(&mut self) -> bool {
        if self.current_page > 1 {
            self.current_page -= 1;
            true
        } else {
            false
        }
    }

    /// Jumps to `page`, clamped into `[1, total_pages]`
    pub fn go_to_page(&mut self, page: usize) {
        self.current_page = page.clamp(1, self.total_pages);
    }

    /// Index range of the current page within the listing
    pub fn page_range(&self) -> Range<usize> {
        let start = ((self.current_page - 1) * self.stories_per_page).min(self.total_items);
        let end = (start + self.stories_per_page).min(self.total_items);
        start..end
    }

    /// The items of the current page
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let range = self.page_range();
        let end = range.end.min(items.len());
        &items[range.start.min(end)..end]
    }

    /// Validates a 1-based story number against a page with `selectable` stories
    ///
    /// Returns the 0-based index on success.
    pub fn select(&self, number: usize, selectable: usize) -> Result<usize, PageError> {
        if (1..=selectable).contains(&number) {
            Ok(number - 1)
        } else {
            Err(PageError::InvalidSelection { max: selectable })
        }
    }
}

/// One line of a materialized page
#[derive(Debug, Clone, PartialEq)]
pub enum PageRow {
    /// A story that loaded successfully
    Story(Story),
    /// A story whose fetch failed; shown inline as an error line
    Failed {
        /// ID that could not be loaded
        id: u64,
        /// Error message
        message: String,
    },
}

/// Stories of a page, skipping failed rows
pub fn stories(rows: &[PageRow]) -> impl Iterator<Item = &Story> {
    rows.iter().filter_map(|row| match row {
        PageRow::Story(story) => Some(story),
        PageRow::Failed { .. } => None,
    })
}

/// Fetches every ID of a page, one at a time
///
/// Items that are not stories are skipped. A failed fetch becomes a
/// [`PageRow::Failed`] and the rest of the page still loads.
pub async fn load_page<S: HnSource>(source: &mut S, ids: &[u64]) -> Vec<PageRow> {
    let mut rows = Vec::with_capacity(ids.len());
    for &id in ids {
        match source.item(id).await {
            Ok(story) if story.is_story() => rows.push(PageRow::Story(story)),
            Ok(_) => {}
            Err(e) => {
                warn!(id, error = %e, "story failed to load");
                rows.push(PageRow::Failed {
                    id,
                    message: e.to_string(),
                });
            }
        }
    }
    rows
}
