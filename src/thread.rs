use std::sync::Arc;

use board_api::{BoardApiClient, BoardApiError};
use comment_thread::{
    build_forest, flatten_visible, Comment, CommentNode, RenderedComment, ReplyVisibility,
};
use serde::{Deserialize, Serialize};

/// Root comments fetched per page.
pub const DEFAULT_PAGE_SIZE: u32 = 5;

/// One page of root comments as the board serves it.
#[derive(Debug, Clone, Deserialize)]
pub struct CommentPage {
    pub comments: Vec<Comment>,
    #[serde(rename = "totalPages")]
    pub total_pages: u32,
}

/// Submission payload for a new comment or reply.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    pub diary_id: i64,
    pub comment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_comment_id: Option<i64>,
}

/// Edit payload for an existing comment.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentEdit {
    pub id: i64,
    pub comment: String,
}

/// Stateful view over one diary's comment section.
///
/// The paged root list and the full threaded forest are fetched separately
/// and kept in step: every mutation refetches the flat list and re-derives
/// the whole forest, so the displayed tree is always a pure function of the
/// latest server response. Nothing is patched in place.
pub struct ThreadView {
    api: Arc<BoardApiClient>,
    diary_id: i64,
    page: u32,
    page_size: u32,
    total_pages: u32,
    search_type: String,
    search_keyword: String,
    roots: Vec<Comment>,
    all_comments: Vec<Comment>,
    forest: Vec<CommentNode>,
    visibility: ReplyVisibility,
}

impl ThreadView {
    #[must_use]
    pub fn new(api: Arc<BoardApiClient>, diary_id: i64) -> Self {
        Self {
            api,
            diary_id,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            total_pages: 1,
            search_type: "all".to_owned(),
            search_keyword: String::new(),
            roots: Vec::new(),
            all_comments: Vec::new(),
            forest: Vec::new(),
            visibility: ReplyVisibility::new(),
        }
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    #[must_use]
    pub fn diary_id(&self) -> i64 {
        self.diary_id
    }

    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    #[must_use]
    pub fn roots(&self) -> &[Comment] {
        &self.roots
    }

    #[must_use]
    pub fn forest(&self) -> &[CommentNode] {
        &self.forest
    }

    #[must_use]
    pub fn visibility(&self) -> &ReplyVisibility {
        &self.visibility
    }

    /// Applies a search filter for subsequent page loads.
    pub fn set_search(&mut self, search_type: impl Into<String>, keyword: impl Into<String>) {
        self.search_type = search_type.into();
        self.search_keyword = keyword.into();
    }

    /// Fetches one page of root comments, clamping to the known page range.
    pub async fn load_page(&mut self, page: u32) -> Result<(), BoardApiError> {
        let page = page.clamp(1, self.total_pages.max(1));
        let response = self
            .api
            .get_with_query(
                "/diaryComment/list",
                &[
                    ("diaryId", self.diary_id.to_string()),
                    ("page", page.to_string()),
                    ("pageSize", self.page_size.to_string()),
                    ("type", self.search_type.clone()),
                    ("keyword", self.search_keyword.clone()),
                ],
            )
            .await?;

        let parsed: CommentPage = response.json()?;
        self.page = page;
        self.total_pages = parsed.total_pages.max(1);
        self.roots = parsed.comments;
        Ok(())
    }

    /// Refetches the flat comment list and rebuilds the threaded forest.
    pub async fn refresh_forest(&mut self) -> Result<(), BoardApiError> {
        let response = self
            .api
            .get_with_query("/diaryComment/all", &[("diaryId", self.diary_id.to_string())])
            .await?;

        self.all_comments = response.json()?;
        self.forest = build_forest(&self.all_comments);
        Ok(())
    }

    /// Loads the current page and the forest together.
    pub async fn reload(&mut self) -> Result<(), BoardApiError> {
        self.load_page(self.page).await?;
        self.refresh_forest().await
    }

    /// Submits a new comment, or a reply when `reply_comment_id` is set.
    pub async fn submit(
        &mut self,
        body: &str,
        reply_comment_id: Option<i64>,
    ) -> Result<(), BoardApiError> {
        let payload = NewComment {
            diary_id: self.diary_id,
            comment: body.to_owned(),
            reply_comment_id,
        };
        self.api.post_json("/diaryComment/add", &payload).await?;
        self.reload().await
    }

    /// Rewrites the body of an owned comment.
    pub async fn edit(&mut self, id: i64, body: &str) -> Result<(), BoardApiError> {
        let payload = CommentEdit {
            id,
            comment: body.to_owned(),
        };
        self.api.put_json("/diaryComment/edit", &payload).await?;
        self.reload().await
    }

    /// Deletes an owned comment. The server cascades to its replies, which
    /// the refetched forest reflects.
    pub async fn delete(&mut self, id: i64) -> Result<(), BoardApiError> {
        self.api.delete(&format!("/diaryComment/{id}")).await?;
        self.reload().await
    }

    /// Flips the show-more state for one root comment's reply list.
    pub fn toggle_replies(&mut self, root_id: i64) {
        self.visibility.toggle(root_id);
    }

    /// Rows to display for the current forest and visibility state.
    #[must_use]
    pub fn visible_rows(&self) -> Vec<RenderedComment<'_>> {
        flatten_visible(&self.forest, &self.visibility)
    }

    /// Replies hidden behind the show-more affordance of `root_id`.
    #[must_use]
    pub fn hidden_reply_count(&self, root_id: i64) -> usize {
        self.forest
            .iter()
            .find(|node| node.comment.id == root_id)
            .map_or(0, |node| self.visibility.hidden_reply_count(node))
    }
}
