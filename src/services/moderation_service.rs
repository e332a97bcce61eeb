//! Domain service for the story moderation workflow.
//!
//! A story is created `Pending` and becomes `Approved` when an admin approves
//! it. That is the only transition. Public reads only ever see approved
//! stories; the pending queue is admin-only.

use crate::domain::{StoryId, UserId};
use crate::services::image::ImageUpload;
use crate::services::presentation::{CategoryFacet, HomePage, StoryDetail, StoryView};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModerationError {
    #[error("{0}")]
    Validation(String),

    #[error("Access denied")]
    Forbidden,

    #[error("Story {0} not found")]
    NotFound(StoryId),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for ModerationError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for ModerationError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Result of an approve call on an existing story.
#[derive(Debug, Clone)]
pub enum ApproveOutcome {
    Approved(StoryView),
    AlreadyApproved(StoryView),
}

/// Fields of a story submission as received from the form.
#[derive(Debug, Clone, Default)]
pub struct Submission {
    pub title: String,
    pub category: String,
    pub content: String,
    pub image: Option<ImageUpload>,
}

#[async_trait::async_trait]
pub trait ModerationService: Send + Sync {
    /// Stores a new pending story.
    ///
    /// # Errors
    ///
    /// Returns [`ModerationError::Validation`] when title, category or content is
    /// blank, or the category is unknown.
    async fn submit(&self, author: UserId, submission: Submission)
    -> Result<StoryView, ModerationError>;

    /// Approves a story. `Ok(None)` when the id does not exist; approving an
    /// approved story changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ModerationError::Forbidden`] unless `caller` is an admin.
    async fn approve(
        &self,
        caller: UserId,
        story: StoryId,
    ) -> Result<Option<ApproveOutcome>, ModerationError>;

    /// Pending stories, oldest first. Admin only.
    async fn list_pending(&self, caller: UserId) -> Result<Vec<StoryView>, ModerationError>;

    /// Approved stories, newest first, optionally limited to one category.
    async fn list_approved(&self, category: Option<&str>)
    -> Result<Vec<StoryView>, ModerationError>;

    /// An approved story with its comments.
    ///
    /// # Errors
    ///
    /// Returns [`ModerationError::NotFound`] when the story is missing or pending.
    async fn get_approved(
        &self,
        story: StoryId,
        viewer: Option<UserId>,
    ) -> Result<StoryDetail, ModerationError>;

    /// Featured and latest approved stories plus category facets.
    async fn home(&self) -> Result<HomePage, ModerationError>;

    /// A user's own submissions in every state, newest first.
    async fn list_for_author(&self, author: UserId) -> Result<Vec<StoryView>, ModerationError>;

    /// Approved-story count per category.
    async fn category_facets(&self) -> Result<Vec<CategoryFacet>, ModerationError>;

    /// Names of all selectable categories.
    async fn categories(&self) -> Result<Vec<String>, ModerationError>;
}
