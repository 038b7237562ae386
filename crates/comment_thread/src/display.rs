use std::collections::HashSet;

use crate::model::Comment;
use crate::tree::CommentNode;

/// Default number of direct replies shown under a root comment.
pub const DEFAULT_REPLY_CAP: usize = 3;

/// Partial-expansion state for root-level reply lists.
///
/// The cap applies only to the direct children of top-level comments; once
/// an ancestor chain is visible, deeper levels are always fully expanded.
/// The underlying forest is never touched by toggling.
#[derive(Debug, Clone)]
pub struct ReplyVisibility {
    cap: usize,
    expanded: HashSet<i64>,
}

impl ReplyVisibility {
    #[must_use]
    pub fn new() -> Self {
        Self::with_cap(DEFAULT_REPLY_CAP)
    }

    #[must_use]
    pub fn with_cap(cap: usize) -> Self {
        Self {
            cap,
            expanded: HashSet::new(),
        }
    }

    #[must_use]
    pub fn cap(&self) -> usize {
        self.cap
    }

    #[must_use]
    pub fn is_expanded(&self, root_id: i64) -> bool {
        self.expanded.contains(&root_id)
    }

    /// Flips the show-more state for one root comment. Toggling twice
    /// restores the original displayed count.
    pub fn toggle(&mut self, root_id: i64) {
        if !self.expanded.remove(&root_id) {
            self.expanded.insert(root_id);
        }
    }

    /// Collapses every expanded root, e.g. after a page change.
    pub fn reset(&mut self) {
        self.expanded.clear();
    }

    /// Direct children of `root` that are currently displayed.
    #[must_use]
    pub fn visible_children<'a>(&self, root: &'a CommentNode) -> &'a [CommentNode] {
        if self.is_expanded(root.comment.id) {
            &root.children
        } else {
            &root.children[..root.children.len().min(self.cap)]
        }
    }

    /// Number of direct replies hidden behind the show-more affordance.
    #[must_use]
    pub fn hidden_reply_count(&self, root: &CommentNode) -> usize {
        root.children.len() - self.visible_children(root).len()
    }
}

impl Default for ReplyVisibility {
    fn default() -> Self {
        Self::new()
    }
}

/// One displayable row of a rendered thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderedComment<'a> {
    pub depth: usize,
    pub comment: &'a Comment,
}

/// Renders the forest to display rows, honoring root-level truncation.
///
/// Pure recursion over derived, immutable data; the forest is not modified.
#[must_use]
pub fn flatten_visible<'a>(
    forest: &'a [CommentNode],
    visibility: &ReplyVisibility,
) -> Vec<RenderedComment<'a>> {
    let mut rows = Vec::new();
    for root in forest {
        rows.push(RenderedComment {
            depth: 0,
            comment: &root.comment,
        });
        for child in visibility.visible_children(root) {
            push_subtree(child, 1, &mut rows);
        }
    }
    rows
}

fn push_subtree<'a>(node: &'a CommentNode, depth: usize, rows: &mut Vec<RenderedComment<'a>>) {
    rows.push(RenderedComment {
        depth,
        comment: &node.comment,
    });
    for child in &node.children {
        push_subtree(child, depth + 1, rows);
    }
}
