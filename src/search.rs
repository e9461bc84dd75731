//! Local story search
//!
//! There is no search endpoint in the Firebase API, so search scans the head of
//! each ranked list and keeps stories whose title or text contains the query.

use std::collections::HashSet;

use crate::data::{Category, HnSource, Story};
use crate::error::HnError;

/// IDs taken from the head of each category
pub const IDS_PER_CATEGORY: usize = 100;

/// Scanning stops once this many stories matched
pub const MAX_MATCHES: usize = 100;

/// Whether `story` matches an already lowercased query
fn matches(story: &Story, query: &str) -> bool {
    let title = story.title.as_deref().unwrap_or_default().to_lowercase();
    let text = story.text.as_deref().unwrap_or_default().to_lowercase();
    title.contains(query) || text.contains(query)
}

/// Collects up to [`IDS_PER_CATEGORY`] IDs from every category, de-duplicated
///
/// A category that fails to load is passed to `on_error` and skipped.
pub async fn candidate_ids<S, F>(source: &mut S, mut on_error: F) -> Vec<u64>
where
    S: HnSource,
    F: FnMut(Category, &HnError),
{
    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    for category in Category::all() {
        match source.story_ids(category).await {
            Ok(list) => ids.extend(
                list.into_iter()
                    .take(IDS_PER_CATEGORY)
                    .filter(|id| seen.insert(*id)),
            ),
            Err(e) => on_error(category, &e),
        }
    }
    ids
}

/// Scans candidate stories for `query`, case-insensitively
///
/// Items are fetched one at a time. Items that fail to load are ignored.
pub async fn search_stories<S, F>(source: &mut S, query: &str, on_error: F) -> Vec<Story>
where
    S: HnSource,
    F: FnMut(Category, &HnError),
{
    let query = query.to_lowercase();
    let mut found = Vec::new();
    for id in candidate_ids(source, on_error).await {
        if found.len() >= MAX_MATCHES {
            break;
        }
        if let Ok(story) = source.item(id).await {
            if story.is_story() && matches(&story, &query) {
                found.push(story);
            }
        }
    }
    found
}
