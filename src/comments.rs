//! Comment tree navigation
//!
//! A story's comments are browsed in two states. **List** shows the top-level
//! comments, one selectable line each. **Expanded** shows the selected comment
//! and all of its descendants flattened into a scrollable line buffer.

use crossterm::event::{KeyCode, KeyEvent};
use tracing::{debug, warn};

use crate::data::{HnSource, Story};
use crate::text;

/// Fewest top-level comments loaded when no limit is given
pub const MIN_TOP_LEVEL_COMMENTS: usize = 5;

/// Most top-level comments loaded when no limit is given
pub const MAX_TOP_LEVEL_COMMENTS: usize = 10;

/// Rows reserved for the comment list chrome when sizing the default limit
const LIST_RESERVED_ROWS: u16 = 5;

/// Widest a comment body is ever wrapped
const MAX_WRAP_WIDTH: usize = 100;

/// Columns kept free to the right of a comment body
const WRAP_MARGIN: usize = 5;

/// Narrowest wrap width used on tiny terminals
const MIN_WRAP_WIDTH: usize = 10;

/// Indentation added per reply level
const INDENT: &str = "  ";

/// Characters of a comment shown in the List summary
pub const SUMMARY_CHARS: usize = 80;

/// How many top-level comments to load
///
/// An explicit limit wins; otherwise `clamp(rows - 5, 5, 10)`.
pub fn top_level_limit(explicit: Option<usize>, rows: u16) -> usize {
    explicit.unwrap_or_else(|| {
        (rows.saturating_sub(LIST_RESERVED_ROWS) as usize)
            .clamp(MIN_TOP_LEVEL_COMMENTS, MAX_TOP_LEVEL_COMMENTS)
    })
}

/// Fetches the first `limit` direct replies of `story`
///
/// Deleted and dead comments are dropped, as are comments that fail to load.
/// Order is preserved.
pub async fn load_top_level<S: HnSource>(source: &mut S, story: &Story, limit: usize) -> Vec<Story> {
    let mut comments = Vec::new();
    for &id in story.kids.iter().take(limit) {
        match source.item(id).await {
            Ok(comment) if !comment.is_removed() => comments.push(comment),
            Ok(_) => debug!(id, "skipping removed comment"),
            Err(e) => warn!(id, error = %e, "comment failed to load"),
        }
    }
    comments
}

/// Role of a line in the flattened buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Author and age of a comment
    Header,
    /// A wrapped line of the comment body
    Body,
    /// Spacer after each comment
    Blank,
}

/// A pre-rendered display line of a flattened thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentLine {
    /// Reply depth, 0 for the expanded comment
    pub depth: usize,
    /// What the line shows
    pub kind: LineKind,
    /// Indented text
    pub text: String,
}

/// Wrap width for a comment at `depth` on a terminal `columns` wide
pub fn wrap_width(columns: u16, depth: usize) -> usize {
    let indent = INDENT.len() * depth;
    (columns as usize)
        .saturating_sub(indent + WRAP_MARGIN)
        .min(MAX_WRAP_WIDTH)
        .max(MIN_WRAP_WIDTH)
}

/// Renders one comment as a header, its wrapped body and a blank line
pub fn render_comment(comment: &Story, depth: usize, columns: u16) -> Vec<CommentLine> {
    let indent = INDENT.repeat(depth);
    let mut lines = vec![CommentLine {
        depth,
        kind: LineKind::Header,
        text: format!("{indent}{} {}", comment.author(), text::age(comment.time)),
    }];

    let body = text::strip_html(comment.text.as_deref().unwrap_or_default());
    lines.extend(
        text::wrap(&body, wrap_width(columns, depth))
            .into_iter()
            .map(|line| CommentLine {
                depth,
                kind: LineKind::Body,
                text: format!("{indent}{line}"),
            }),
    );

    lines.push(CommentLine {
        depth,
        kind: LineKind::Blank,
        text: String::new(),
    });
    lines
}

/// Flattens `root` and all of its descendants in depth-first pre-order
///
/// Children are fetched on demand from `source`. Removed comments are pruned
/// together with their subtrees, so their children are never requested.
/// Children that fail to load are skipped. There is no depth limit.
pub async fn flatten_thread<S: HnSource>(source: &mut S, root: &Story, columns: u16) -> Vec<CommentLine> {
    let mut lines = Vec::new();
    if root.is_removed() {
        return lines;
    }
    lines.extend(render_comment(root, 0, columns));

    // Pending child IDs with their depth; reversed so the first reply pops first.
    let mut stack: Vec<(u64, usize)> = root.kids.iter().rev().map(|&id| (id, 1)).collect();

    while let Some((id, depth)) = stack.pop() {
        let comment = match source.item(id).await {
            Ok(comment) => comment,
            Err(e) => {
                warn!(id, error = %e, "reply failed to load");
                continue;
            }
        };
        if comment.is_removed() {
            continue;
        }
        lines.extend(render_comment(&comment, depth, columns));
        stack.extend(comment.kids.iter().rev().map(|&kid| (kid, depth + 1)));
    }

    lines
}

/// Lines available to the Expanded view on a terminal `rows` high
pub fn expanded_view_height(rows: u16) -> usize {
    (rows.saturating_sub(1) as usize).max(1)
}

/// Navigator state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigatorView {
    /// Top-level comment list
    List,
    /// Flattened subtree of the selected comment
    Expanded {
        /// Pre-rendered lines of the subtree
        lines: Vec<CommentLine>,
        /// First visible line
        offset: usize,
    },
}

/// What the caller must do after a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigatorAction {
    /// Nothing beyond redrawing
    None,
    /// Load and flatten the subtree of the comment at this index
    Expand(usize),
    /// Leave the navigator
    Exit,
}

/// Keyboard-driven browsing of a story's comments
#[derive(Debug, Clone)]
pub struct CommentNavigator {
    /// Loaded top-level comments
    pub comments: Vec<Story>,
    /// Index of the selected comment in List
    pub selected: usize,
    /// Current view
    pub view: NavigatorView,
}

impl CommentNavigator {
    /// Starts in List with the first comment selected
    pub fn new(comments: Vec<Story>) -> Self {
        Self {
            comments,
            selected: 0,
            view: NavigatorView::List,
        }
    }

    /// Handles a key press
    ///
    /// # Key Bindings
    /// List:
    /// - `Up`/`k`, `Down`/`j`: Move selection, wrapping at both ends
    /// - `Enter`: Expand the selected comment
    /// - `q`, `b`, `Esc`: Leave the navigator
    ///
    /// Expanded:
    /// - `Up`/`k`, `Down`/`j`: Scroll one line
    /// - any other key: Back to List
    pub fn handle_key(&mut self, key_event: KeyEvent, view_height: usize) -> NavigatorAction {
        match self.view {
            NavigatorView::List => match key_event.code {
                KeyCode::Up | KeyCode::Char('k') => {
                    self.move_selection_up();
                    NavigatorAction::None
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    self.move_selection_down();
                    NavigatorAction::None
                }
                KeyCode::Enter if !self.comments.is_empty() => NavigatorAction::Expand(self.selected),
                KeyCode::Char('q') | KeyCode::Char('b') | KeyCode::Esc => NavigatorAction::Exit,
                _ => NavigatorAction::None,
            },
            NavigatorView::Expanded { .. } => {
                match key_event.code {
                    KeyCode::Up | KeyCode::Char('k') => self.scroll_up(),
                    KeyCode::Down | KeyCode::Char('j') => self.scroll_down(view_height),
                    _ => self.collapse(),
                }
                NavigatorAction::None
            }
        }
    }

    /// Moves the selection up, wrapping to the last comment
    fn move_selection_up(&mut self) {
        let count = self.comments.len();
        if count == 0 {
            return;
        }
        if self.selected == 0 {
            self.selected = count - 1;
        } else {
            self.selected -= 1;
        }
    }

    /// Moves the selection down, wrapping to the first comment
    fn move_selection_down(&mut self) {
        let count = self.comments.len();
        if count == 0 {
            return;
        }
        self.selected = (self.selected + 1) % count;
    }

    /// Switches to Expanded with a freshly flattened buffer
    pub fn expand(&mut self, lines: Vec<CommentLine>) {
        self.view = NavigatorView::Expanded { lines, offset: 0 };
    }

    /// Returns to List, keeping the selection
    pub fn collapse(&mut self) {
        self.view = NavigatorView::List;
    }

    /// Scrolls one line up, stopping at the top
    pub fn scroll_up(&mut self) {
        if let NavigatorView::Expanded { offset, .. } = &mut self.view {
            *offset = offset.saturating_sub(1);
        }
    }

    /// Scrolls one line down, stopping when the last line is visible
    pub fn scroll_down(&mut self, view_height: usize) {
        if let NavigatorView::Expanded { lines, offset } = &mut self.view {
            let max_offset = lines.len().saturating_sub(view_height);
            *offset = (*offset + 1).min(max_offset);
        }
    }

    /// Re-clamps the scroll offset after the view height changed
    pub fn clamp_offset(&mut self, view_height: usize) {
        if let NavigatorView::Expanded { lines, offset } = &mut self.view {
            *offset = (*offset).min(lines.len().saturating_sub(view_height));
        }
    }

    /// Lines visible in Expanded for the given height
    pub fn visible_lines(&self, view_height: usize) -> &[CommentLine] {
        match &self.view {
            NavigatorView::Expanded { lines, offset } => {
                let start = (*offset).min(lines.len());
                let end = (start + view_height).min(lines.len());
                &lines[start..end]
            }
            NavigatorView::List => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fake::{comment, FakeSource};
    use crossterm::event::KeyModifiers;

    fn key_event(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn deleted(id: u64, kids: Vec<u64>) -> Story {
        Story {
            id,
            deleted: true,
            kids,
            ..Default::default()
        }
    }

    fn thread_source() -> FakeSource {
        // 10
        // ├── 11
        // │   └── 13
        // └── 12 (deleted)
        //     └── 14
        FakeSource::new()
            .with_item(comment(10, "root", "Root body", vec![11, 12]))
            .with_item(comment(11, "alice", "First reply", vec![13]))
            .with_item(deleted(12, vec![14]))
            .with_item(comment(13, "bob", "Nested reply", vec![]))
            .with_item(comment(14, "carol", "Hidden under deleted", vec![]))
    }

    fn headers(lines: &[CommentLine]) -> Vec<String> {
        lines
            .iter()
            .filter(|l| l.kind == LineKind::Header)
            .map(|l| l.text.split_whitespace().next().unwrap_or_default().to_string())
            .collect()
    }

    fn expanded_with(lines: usize) -> CommentNavigator {
        let mut nav = CommentNavigator::new(vec![comment(1, "a", "x", vec![])]);
        let buffer = (0..lines)
            .map(|i| CommentLine {
                depth: 0,
                kind: LineKind::Body,
                text: format!("line {i}"),
            })
            .collect();
        nav.expand(buffer);
        nav
    }

    fn offset(nav: &CommentNavigator) -> usize {
        match nav.view {
            NavigatorView::Expanded { offset, .. } => offset,
            NavigatorView::List => panic!("expected expanded view"),
        }
    }

    #[test]
    fn test_top_level_limit() {
        assert_eq!(top_level_limit(Some(3), 50), 3);
        assert_eq!(top_level_limit(None, 8), 5);
        assert_eq!(top_level_limit(None, 12), 7);
        assert_eq!(top_level_limit(None, 60), 10);
    }

    #[test]
    fn test_wrap_width() {
        assert_eq!(wrap_width(200, 0), 100);
        assert_eq!(wrap_width(80, 0), 75);
        assert_eq!(wrap_width(80, 2), 71);
        assert_eq!(wrap_width(8, 3), 10);
    }

    #[test]
    fn test_render_comment_indents_by_depth() {
        let c = comment(1, "alice", "hello <i>world</i>", vec![]);
        let lines = render_comment(&c, 2, 80);

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].kind, LineKind::Header);
        assert!(lines[0].text.starts_with("    alice "));
        assert_eq!(lines[1].text, "    hello world");
        assert_eq!(lines[2].kind, LineKind::Blank);
    }

    #[tokio::test]
    async fn test_load_top_level_drops_removed_and_respects_limit() {
        let story = Story {
            id: 1,
            kids: vec![10, 12, 11, 13],
            ..Default::default()
        };
        let mut source = thread_source().with_failure(11);

        let comments = load_top_level(&mut source, &story, 3).await;

        let ids: Vec<u64> = comments.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![10]);
        assert_eq!(source.requested, vec![10, 12, 11]);
    }

    #[tokio::test]
    async fn test_flatten_is_preorder_and_prunes_deleted() {
        let mut source = thread_source();
        let root = source.items[&10].clone();

        let lines = flatten_thread(&mut source, &root, 80).await;

        assert_eq!(headers(&lines), vec!["root", "alice", "bob"]);
        let depths: Vec<usize> = lines
            .iter()
            .filter(|l| l.kind == LineKind::Header)
            .map(|l| l.depth)
            .collect();
        assert_eq!(depths, vec![0, 1, 2]);
        assert!(!source.requested.contains(&14), "children of deleted comments are never fetched");
    }

    #[tokio::test]
    async fn test_flatten_skips_failed_children() {
        let mut source = thread_source().with_failure(11);
        let root = source.items[&10].clone();

        let lines = flatten_thread(&mut source, &root, 80).await;

        assert_eq!(headers(&lines), vec!["root"]);
        assert!(!source.requested.contains(&13));
    }

    #[tokio::test]
    async fn test_flatten_removed_root_is_empty() {
        let mut source = thread_source();
        let lines = flatten_thread(&mut source, &deleted(99, vec![10]), 80).await;
        assert!(lines.is_empty());
        assert!(source.requested.is_empty());
    }

    #[test]
    fn test_selection_wraps_down_at_last_item() {
        let comments = (1..=3).map(|id| comment(id, "a", "x", vec![])).collect();
        let mut nav = CommentNavigator::new(comments);
        nav.selected = 2;

        nav.handle_key(key_event(KeyCode::Down), 10);

        assert_eq!(nav.selected, 0);
    }

    #[test]
    fn test_selection_wraps_up_at_first_item() {
        let comments = (1..=3).map(|id| comment(id, "a", "x", vec![])).collect();
        let mut nav = CommentNavigator::new(comments);

        nav.handle_key(key_event(KeyCode::Char('k')), 10);

        assert_eq!(nav.selected, 2);
    }

    #[test]
    fn test_enter_requests_expand_of_selected() {
        let comments = (1..=3).map(|id| comment(id, "a", "x", vec![])).collect();
        let mut nav = CommentNavigator::new(comments);
        nav.handle_key(key_event(KeyCode::Down), 10);

        assert_eq!(nav.handle_key(key_event(KeyCode::Enter), 10), NavigatorAction::Expand(1));
    }

    #[test]
    fn test_enter_on_empty_list_does_nothing() {
        let mut nav = CommentNavigator::new(Vec::new());
        assert_eq!(nav.handle_key(key_event(KeyCode::Enter), 10), NavigatorAction::None);
        nav.handle_key(key_event(KeyCode::Down), 10);
        assert_eq!(nav.selected, 0);
    }

    #[test]
    fn test_quit_and_back_exit_from_list() {
        let mut nav = CommentNavigator::new(Vec::new());
        assert_eq!(nav.handle_key(key_event(KeyCode::Char('q')), 10), NavigatorAction::Exit);
        assert_eq!(nav.handle_key(key_event(KeyCode::Char('b')), 10), NavigatorAction::Exit);
        assert_eq!(nav.handle_key(key_event(KeyCode::Esc), 10), NavigatorAction::Exit);
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut nav = expanded_with(12);

        nav.handle_key(key_event(KeyCode::Up), 10);
        assert_eq!(offset(&nav), 0);

        for _ in 0..5 {
            nav.handle_key(key_event(KeyCode::Down), 10);
        }
        assert_eq!(offset(&nav), 2);
        assert_eq!(nav.visible_lines(10).len(), 10);
        assert_eq!(nav.visible_lines(10)[0].text, "line 2");
    }

    #[test]
    fn test_scroll_short_buffer_stays_at_zero() {
        let mut nav = expanded_with(3);
        nav.handle_key(key_event(KeyCode::Char('j')), 10);
        assert_eq!(offset(&nav), 0);
    }

    #[test]
    fn test_other_key_returns_to_list() {
        let mut nav = expanded_with(3);
        nav.handle_key(key_event(KeyCode::Char('x')), 10);
        assert_eq!(nav.view, NavigatorView::List);
    }

    #[test]
    fn test_clamp_offset_after_resize() {
        let mut nav = expanded_with(20);
        for _ in 0..15 {
            nav.scroll_down(5);
        }
        assert_eq!(offset(&nav), 15);

        nav.clamp_offset(10);
        assert_eq!(offset(&nav), 10);
    }

    #[test]
    fn test_expanded_view_height() {
        assert_eq!(expanded_view_height(24), 23);
        assert_eq!(expanded_view_height(0), 1);
    }
}
