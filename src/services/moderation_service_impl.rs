//! `SeaORM` implementation of the `ModerationService` trait.

use crate::db::{NewStory, Store, StoryRow};
use crate::domain::{StoryId, StoryState, UserId};
use crate::services::image::ImageStore;
use crate::services::moderation_service::{
    ApproveOutcome, ModerationError, ModerationService, Submission,
};
use crate::services::presentation::{
    Assembler, CategoryFacet, HomePage, StoryDetail, StoryView,
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct SeaOrmModerationService {
    store: Store,
    images: Arc<ImageStore>,
    assembler: Arc<Assembler>,
    featured_limit: u64,
    latest_limit: u64,
}

impl SeaOrmModerationService {
    #[must_use]
    pub const fn new(
        store: Store,
        images: Arc<ImageStore>,
        assembler: Arc<Assembler>,
        featured_limit: u64,
        latest_limit: u64,
    ) -> Self {
        Self {
            store,
            images,
            assembler,
            featured_limit,
            latest_limit,
        }
    }

    async fn require_admin(&self, caller: UserId) -> Result<(), ModerationError> {
        let role = self.store.get_user_role(caller.value()).await?;
        if role.is_some_and(|r| r.is_admin()) {
            Ok(())
        } else {
            warn!(user_id = %caller, "Non-admin attempted a moderation action");
            Err(ModerationError::Forbidden)
        }
    }

    async fn assemble(&self, rows: Vec<StoryRow>) -> Result<Vec<StoryView>, ModerationError> {
        let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
        let counts = self.store.like_counts(&ids).await?;
        Ok(self.assembler.stories(rows, &counts))
    }

    async fn validate(&self, submission: &Submission) -> Result<(), ModerationError> {
        if submission.title.trim().is_empty() {
            return Err(ModerationError::Validation("must provide a title".to_string()));
        }

        if submission.category.trim().is_empty() {
            return Err(ModerationError::Validation(
                "must choose a category".to_string(),
            ));
        }

        if submission.content.trim().is_empty() {
            return Err(ModerationError::Validation(
                "must provide story content".to_string(),
            ));
        }

        if !self.store.category_exists(submission.category.trim()).await? {
            return Err(ModerationError::Validation(format!(
                "unknown category: {}",
                submission.category.trim()
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl ModerationService for SeaOrmModerationService {
    async fn submit(
        &self,
        author: UserId,
        submission: Submission,
    ) -> Result<StoryView, ModerationError> {
        self.validate(&submission).await?;

        let image_path = match submission.image.as_ref() {
            Some(upload) if !upload.bytes.is_empty() => Some(
                self.images
                    .save(upload)
                    .await
                    .map_err(|e| ModerationError::Storage(e.to_string()))?,
            ),
            _ => None,
        };

        let row = self
            .store
            .create_story(NewStory {
                user_id: author.value(),
                title: submission.title.trim(),
                category: submission.category.trim(),
                content: submission.content.trim(),
                image_path,
            })
            .await?;

        metrics::counter!("stories_submitted_total").increment(1);
        info!(
            story_id = row.id,
            user_id = %author,
            category = %row.category,
            "Story submitted for review"
        );

        Ok(self.assembler.story(row, 0))
    }

    async fn approve(
        &self,
        caller: UserId,
        story: StoryId,
    ) -> Result<Option<ApproveOutcome>, ModerationError> {
        self.require_admin(caller).await?;

        let Some(row) = self.store.get_story(story.value()).await? else {
            info!(story_id = %story, "Approve ignored, story does not exist");
            return Ok(None);
        };

        if StoryState::from_flag(row.approved).is_visible() {
            debug!(story_id = %story, "Story already approved");
            let likes = self.store.like_count(row.id).await?;
            return Ok(Some(ApproveOutcome::AlreadyApproved(
                self.assembler.story(row, likes),
            )));
        }

        // Matches zero rows only if the story vanished since the read above.
        if self.store.approve_story(story.value()).await? == 0 {
            return Ok(None);
        }

        metrics::counter!("stories_approved_total").increment(1);
        info!(story_id = %story, admin_id = %caller, "Story approved");

        let likes = self.store.like_count(row.id).await?;
        let row = StoryRow {
            approved: true,
            ..row
        };

        Ok(Some(ApproveOutcome::Approved(self.assembler.story(row, likes))))
    }

    async fn list_pending(&self, caller: UserId) -> Result<Vec<StoryView>, ModerationError> {
        self.require_admin(caller).await?;
        let rows = self.store.list_pending_stories().await?;
        self.assemble(rows).await
    }

    async fn list_approved(
        &self,
        category: Option<&str>,
    ) -> Result<Vec<StoryView>, ModerationError> {
        let category = category.map(str::trim).filter(|c| !c.is_empty());
        let rows = self.store.list_approved_stories(category, None).await?;
        self.assemble(rows).await
    }

    async fn get_approved(
        &self,
        story: StoryId,
        viewer: Option<UserId>,
    ) -> Result<StoryDetail, ModerationError> {
        let row = self
            .store
            .get_story(story.value())
            .await?
            .filter(|row| StoryState::from_flag(row.approved).is_visible())
            .ok_or(ModerationError::NotFound(story))?;

        let likes = self.store.like_count(row.id).await?;
        let comments = self
            .store
            .list_comments(row.id)
            .await?
            .into_iter()
            .map(Assembler::comment)
            .collect();

        let viewer_has_liked = match viewer {
            Some(viewer) => self.store.has_liked(viewer.value(), row.id).await?,
            None => false,
        };

        Ok(StoryDetail {
            story: self.assembler.story(row, likes),
            comments,
            viewer_has_liked,
        })
    }

    async fn home(&self) -> Result<HomePage, ModerationError> {
        let featured = self
            .store
            .list_approved_stories(None, Some(self.featured_limit))
            .await?;
        let latest = self
            .store
            .list_approved_stories(None, Some(self.latest_limit))
            .await?;

        Ok(HomePage {
            featured: self.assemble(featured).await?,
            latest: self.assemble(latest).await?,
            categories: self.category_facets().await?,
        })
    }

    async fn list_for_author(&self, author: UserId) -> Result<Vec<StoryView>, ModerationError> {
        let rows = self.store.list_stories_by_author(author.value()).await?;
        self.assemble(rows).await
    }

    async fn category_facets(&self) -> Result<Vec<CategoryFacet>, ModerationError> {
        let counts = self.store.approved_category_counts().await?;
        Ok(Assembler::facets(counts))
    }

    async fn categories(&self) -> Result<Vec<String>, ModerationError> {
        Ok(self.store.list_categories().await?)
    }
}
