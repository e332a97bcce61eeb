//! Domain service for likes and comments.
//!
//! Neither operation checks the target story's approval state; a comment or
//! like only needs the story to exist.

use crate::domain::{StoryId, UserId};
use crate::services::presentation::CommentView;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngagementError {
    #[error("{0}")]
    Validation(String),

    #[error("Story {0} not found")]
    NotFound(StoryId),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for EngagementError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for EngagementError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Result of a like attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeOutcome {
    Recorded,
    AlreadyLiked,
}

#[async_trait::async_trait]
pub trait EngagementService: Send + Sync {
    /// Likes a story. A repeated like is a no-op, never an error.
    async fn like(&self, user: UserId, story: StoryId) -> Result<LikeOutcome, EngagementError>;

    /// Current like count for a story.
    async fn like_count(&self, story: StoryId) -> Result<u64, EngagementError>;

    /// Adds a comment.
    ///
    /// # Errors
    ///
    /// Returns [`EngagementError::Validation`] on an empty body and
    /// [`EngagementError::NotFound`] for an unknown story.
    async fn comment(
        &self,
        user: UserId,
        story: StoryId,
        content: &str,
    ) -> Result<CommentView, EngagementError>;
}
