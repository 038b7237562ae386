use std::collections::HashMap;

use crate::model::Comment;

/// Derived reply-tree node.
///
/// Built fresh on every [`build_forest`] call and never mutated in place;
/// consumers replace the whole forest after a mutation rather than patching
/// it, so no stale partial tree can linger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentNode {
    pub comment: Comment,
    pub children: Vec<CommentNode>,
}

impl CommentNode {
    /// Total number of descendants beneath this node.
    #[must_use]
    pub fn reply_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| 1 + child.reply_count())
            .sum()
    }
}

/// Builds the root forest from a flat comment list.
///
/// Roots keep input order, as do each node's children. A non-root whose
/// parent id is absent from `comments` is an orphan and is dropped together
/// with everything beneath it; the parent may simply live outside the
/// current page window, so this is tolerance, not an error.
#[must_use]
pub fn build_forest(comments: &[Comment]) -> Vec<CommentNode> {
    let mut children_of: HashMap<i64, Vec<usize>> = HashMap::new();
    let mut roots = Vec::new();

    for (index, comment) in comments.iter().enumerate() {
        match comment.reply_comment_id {
            None => roots.push(index),
            Some(parent_id) => children_of.entry(parent_id).or_default().push(index),
        }
    }

    // Assembly walks down from the roots only, so orphan subtrees and parent
    // cycles are never visited.
    roots
        .into_iter()
        .map(|index| assemble(comments, &children_of, index))
        .collect()
}

fn assemble(
    comments: &[Comment],
    children_of: &HashMap<i64, Vec<usize>>,
    index: usize,
) -> CommentNode {
    let comment = comments[index].clone();
    let children = children_of
        .get(&comment.id)
        .map(|indices| {
            indices
                .iter()
                .map(|&child| assemble(comments, children_of, child))
                .collect()
        })
        .unwrap_or_default();

    CommentNode { comment, children }
}
