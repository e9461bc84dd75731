//! In-memory `HnSource` used by unit tests

use std::collections::{HashMap, HashSet};

use super::{Category, HnSource, Story, User};
use crate::error::HnError;

/// Serves items from maps and records every item request
#[derive(Debug, Default)]
pub(crate) struct FakeSource {
    pub(crate) lists: HashMap<Category, Vec<u64>>,
    pub(crate) items: HashMap<u64, Story>,
    pub(crate) users: HashMap<String, User>,
    pub(crate) failing: HashSet<u64>,
    pub(crate) failing_lists: HashSet<Category>,
    pub(crate) requested: Vec<u64>,
    pub(crate) cache_clears: usize,
}

impl FakeSource {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_list(mut self, category: Category, ids: Vec<u64>) -> Self {
        self.lists.insert(category, ids);
        self
    }

    pub(crate) fn with_item(mut self, story: Story) -> Self {
        self.items.insert(story.id, story);
        self
    }

    pub(crate) fn with_failure(mut self, id: u64) -> Self {
        self.failing.insert(id);
        self
    }
}

/// A story item with a title
pub(crate) fn story(id: u64, title: &str) -> Story {
    Story {
        id,
        item_type: Some("story".to_string()),
        title: Some(title.to_string()),
        by: Some("author".to_string()),
        score: Some(1),
        time: Some(0),
        ..Default::default()
    }
}

/// A comment item with a body and children
pub(crate) fn comment(id: u64, by: &str, text: &str, kids: Vec<u64>) -> Story {
    Story {
        id,
        item_type: Some("comment".to_string()),
        by: Some(by.to_string()),
        text: Some(text.to_string()),
        time: Some(0),
        kids,
        ..Default::default()
    }
}

impl HnSource for FakeSource {
    async fn story_ids(&mut self, category: Category) -> Result<Vec<u64>, HnError> {
        if self.failing_lists.contains(&category) {
            return Err(HnError::Request {
                url: format!("fake://{category}stories"),
                reason: "boom".to_string(),
            });
        }
        Ok(self.lists.get(&category).cloned().unwrap_or_default())
    }

    async fn item(&mut self, id: u64) -> Result<Story, HnError> {
        self.requested.push(id);
        if self.failing.contains(&id) {
            return Err(HnError::Request {
                url: format!("fake://item/{id}"),
                reason: "boom".to_string(),
            });
        }
        self.items
            .get(&id)
            .cloned()
            .ok_or_else(|| HnError::NotFound(format!("item {id}")))
    }

    async fn user(&mut self, username: &str) -> Result<User, HnError> {
        self.users
            .get(username)
            .cloned()
            .ok_or_else(|| HnError::NotFound(format!("user {username}")))
    }

    fn clear_cache(&mut self) {
        self.cache_clears += 1;
    }
}
