use axum::{
    Extension, Json,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tower_sessions::Session;

use super::auth::CurrentUser;
use super::notice::{redirect_with_notice, take_notice};
use super::types::PendingPage;
use super::{ApiError, ApiResponse, AppState};
use crate::constants::routes::{HOME, PENDING};
use crate::domain::StoryId;
use crate::services::{ApproveOutcome, ModerationError};

/// GET /admin/pending
pub async fn pending(
    State(state): State<Arc<AppState>>,
    session: Session,
    Extension(user): Extension<CurrentUser>,
) -> Result<Response, ApiError> {
    match state.moderation_service().list_pending(user.id).await {
        Ok(stories) => Ok(Json(
            ApiResponse::success(PendingPage { stories })
                .with_notice(take_notice(&session).await),
        )
        .into_response()),
        Err(ModerationError::Forbidden) => Ok(redirect_with_notice(&session, HOME, "Access denied")
            .await
            .into_response()),
        Err(e) => Err(e.into()),
    }
}

/// POST /admin/stories/{id}/approve
///
/// An unknown id is a silent no-op.
pub async fn approve(
    State(state): State<Arc<AppState>>,
    session: Session,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Redirect, ApiError> {
    let story_id = StoryId::new(id);

    match state.moderation_service().approve(user.id, story_id).await {
        Ok(Some(ApproveOutcome::Approved(story))) => Ok(redirect_with_notice(
            &session,
            PENDING,
            format!("Approved \"{}\"", story.title),
        )
        .await),
        Ok(Some(ApproveOutcome::AlreadyApproved(story))) => Ok(redirect_with_notice(
            &session,
            PENDING,
            format!("\"{}\" was already approved", story.title),
        )
        .await),
        Ok(None) => Ok(Redirect::to(PENDING)),
        Err(ModerationError::Forbidden) => {
            Ok(redirect_with_notice(&session, HOME, "Access denied").await)
        }
        Err(e) => Err(e.into()),
    }
}
