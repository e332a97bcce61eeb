//! `SeaORM` implementation of the `EngagementService` trait.

use crate::db::Store;
use crate::domain::{StoryId, UserId};
use crate::services::engagement_service::{EngagementError, EngagementService, LikeOutcome};
use crate::services::presentation::{Assembler, CommentView};
use async_trait::async_trait;
use tracing::{debug, info};

pub struct SeaOrmEngagementService {
    store: Store,
}

impl SeaOrmEngagementService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    async fn ensure_story(&self, story: StoryId) -> Result<(), EngagementError> {
        if self.store.story_exists(story.value()).await? {
            Ok(())
        } else {
            Err(EngagementError::NotFound(story))
        }
    }
}

#[async_trait]
impl EngagementService for SeaOrmEngagementService {
    async fn like(&self, user: UserId, story: StoryId) -> Result<LikeOutcome, EngagementError> {
        self.ensure_story(story).await?;

        if self.store.like_story(user.value(), story.value()).await? {
            metrics::counter!("likes_recorded_total").increment(1);
            info!(user_id = %user, story_id = %story, "Like recorded");
            Ok(LikeOutcome::Recorded)
        } else {
            debug!(user_id = %user, story_id = %story, "Duplicate like ignored");
            Ok(LikeOutcome::AlreadyLiked)
        }
    }

    async fn like_count(&self, story: StoryId) -> Result<u64, EngagementError> {
        Ok(self.store.like_count(story.value()).await?)
    }

    async fn comment(
        &self,
        user: UserId,
        story: StoryId,
        content: &str,
    ) -> Result<CommentView, EngagementError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(EngagementError::Validation(
                "comment cannot be empty".to_string(),
            ));
        }

        self.ensure_story(story).await?;

        let row = self
            .store
            .add_comment(user.value(), story.value(), content)
            .await?;

        info!(comment_id = row.id, user_id = %user, story_id = %story, "Comment added");

        Ok(Assembler::comment(row))
    }
}
