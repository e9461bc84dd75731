//! Core data models for hncli
//!
//! This module contains the types returned by the Hacker News API: items
//! (stories, comments, jobs), user profiles and the story categories the
//! client can list.

pub mod client;
#[cfg(test)]
pub(crate) mod fake;

pub use client::{HnClient, HnSource};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Base URL of the Hacker News website, used for discussion and profile links
pub const HN_WEB_URL: &str = "https://news.ycombinator.com";

/// An item returned by the API: a story, comment, job or poll
///
/// Every field except `id` may be missing from the remote payload. Items are
/// never mutated after they are fetched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Story {
    /// Unique item identifier
    pub id: u64,
    /// Username of the author
    pub by: Option<String>,
    /// Creation time in epoch seconds
    pub time: Option<i64>,
    /// Item kind: "story", "comment", "job", "poll" or "pollopt"
    #[serde(rename = "type")]
    pub item_type: Option<String>,
    /// Story title
    pub title: Option<String>,
    /// Link target of the story
    pub url: Option<String>,
    /// Points
    pub score: Option<i64>,
    /// Total number of comments in the thread
    pub descendants: Option<i64>,
    /// Direct children, in ranked order
    #[serde(default)]
    pub kids: Vec<u64>,
    /// HTML body of a comment or self post
    pub text: Option<String>,
    /// Parent item of a comment
    pub parent: Option<u64>,
    /// Set when the item was deleted by its author
    #[serde(default)]
    pub deleted: bool,
    /// Set when the item was killed by moderation
    #[serde(default)]
    pub dead: bool,
}

impl Story {
    /// Whether this item is a story (not a job, poll or comment)
    pub fn is_story(&self) -> bool {
        self.item_type.as_deref() == Some("story")
    }

    /// Whether this item was deleted or killed and must not be shown
    pub fn is_removed(&self) -> bool {
        self.deleted || self.dead
    }

    /// Discussion page on the Hacker News website
    pub fn discussion_url(&self) -> String {
        format!("{HN_WEB_URL}/item?id={}", self.id)
    }

    /// Link target, falling back to the discussion page for self posts
    pub fn link(&self) -> String {
        self.url.clone().unwrap_or_else(|| self.discussion_url())
    }

    /// Title or a placeholder
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("No title")
    }

    /// Author or a placeholder
    pub fn author(&self) -> &str {
        self.by.as_deref().unwrap_or("unknown")
    }

    /// Number of direct replies
    pub fn comment_count(&self) -> usize {
        self.kids.len()
    }

    /// Host part of the story URL, if it has one
    pub fn domain(&self) -> Option<&str> {
        let url = self.url.as_deref()?;
        let (_, rest) = url.split_once("://")?;
        let host = rest.split('/').next()?;
        (!host.is_empty()).then_some(host)
    }
}

/// A user profile returned by the API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Case-sensitive username
    pub id: String,
    /// Account creation time in epoch seconds
    pub created: Option<i64>,
    /// Karma
    pub karma: Option<i64>,
    /// HTML self-description
    pub about: Option<String>,
    /// IDs of the user's stories, polls and comments
    #[serde(default)]
    pub submitted: Vec<u64>,
}

impl User {
    /// Profile page on the Hacker News website
    pub fn profile_url(&self) -> String {
        format!("{HN_WEB_URL}/user?id={}", self.id)
    }
}

/// Discussion page for an item ID
pub fn item_url(id: u64) -> String {
    format!("{HN_WEB_URL}/item?id={id}")
}

/// Ranked story lists offered by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Top,
    New,
    Best,
}

impl Category {
    /// All categories in the order search scans them
    pub fn all() -> [Category; 3] {
        [Category::Top, Category::New, Category::Best]
    }

    /// Lowercase name used in URLs and cache keys
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Top => "top",
            Category::New => "new",
            Category::Best => "best",
        }
    }

    /// Capitalized name used in titles
    pub fn label(&self) -> &'static str {
        match self {
            Category::Top => "Top",
            Category::New => "New",
            Category::Best => "Best",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
