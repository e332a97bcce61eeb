use axum::{
    Extension, Form,
    extract::{Path, State},
    response::Redirect,
};
use std::sync::Arc;
use tower_sessions::Session;

use super::auth::CurrentUser;
use super::notice::redirect_with_notice;
use super::types::CommentForm;
use super::{ApiError, AppState};
use crate::constants::routes::STORIES;
use crate::domain::StoryId;
use crate::services::{EngagementError, LikeOutcome};

impl From<EngagementError> for ApiError {
    fn from(err: EngagementError) -> Self {
        match err {
            EngagementError::Validation(msg) => ApiError::validation(msg),
            EngagementError::NotFound(id) => ApiError::not_found("Story", id),
            EngagementError::Database(msg) => ApiError::database(msg),
        }
    }
}

fn story_path(id: i32) -> String {
    format!("{STORIES}/{id}")
}

/// POST /stories/{id}/like
pub async fn like(
    State(state): State<Arc<AppState>>,
    session: Session,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Redirect, ApiError> {
    let story_id = StoryId::new(id);

    let notice = match state.engagement_service().like(user.id, story_id).await {
        Ok(LikeOutcome::Recorded) => "Liked!",
        Ok(LikeOutcome::AlreadyLiked) => "You already liked this story",
        Err(EngagementError::NotFound(_)) => {
            return Ok(redirect_with_notice(&session, STORIES, "Story not found").await);
        }
        Err(e) => return Err(e.into()),
    };

    Ok(redirect_with_notice(&session, &story_path(id), notice).await)
}

/// POST /stories/{id}/comments
pub async fn comment(
    State(state): State<Arc<AppState>>,
    session: Session,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i32>,
    Form(form): Form<CommentForm>,
) -> Result<Redirect, ApiError> {
    let story_id = StoryId::new(id);

    match state
        .engagement_service()
        .comment(user.id, story_id, &form.content)
        .await
    {
        Ok(_) => Ok(redirect_with_notice(&session, &story_path(id), "Comment posted").await),
        Err(EngagementError::Validation(msg)) => {
            Ok(redirect_with_notice(&session, &story_path(id), msg).await)
        }
        Err(EngagementError::NotFound(_)) => {
            Ok(redirect_with_notice(&session, STORIES, "Story not found").await)
        }
        Err(e) => Err(e.into()),
    }
}
