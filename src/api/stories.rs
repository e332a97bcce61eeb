use axum::{
    Extension, Json,
    extract::{Multipart, Path, Query, State},
    response::Redirect,
};
use std::sync::Arc;
use tower_sessions::Session;

use super::auth::{CurrentUser, session_user_id};
use super::notice::{redirect_with_notice, take_notice};
use super::types::{StoriesPage, StoryQuery, SubmitPage};
use super::validation::normalize_category_filter;
use super::{ApiError, ApiResponse, AppState};
use crate::constants::routes::{PROFILE, SUBMIT};
use crate::domain::StoryId;
use crate::services::presentation::{HomePage, StoryDetail};
use crate::services::{ImageUpload, ModerationError, Submission};

impl From<ModerationError> for ApiError {
    fn from(err: ModerationError) -> Self {
        match err {
            ModerationError::Validation(msg) => ApiError::validation(msg),
            ModerationError::Forbidden => ApiError::Forbidden("Access denied".to_string()),
            ModerationError::NotFound(id) => ApiError::not_found("Story", id),
            ModerationError::Database(msg) => ApiError::database(msg),
            ModerationError::Storage(msg) | ModerationError::Internal(msg) => {
                ApiError::internal(msg)
            }
        }
    }
}

/// GET /
pub async fn home(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Json<ApiResponse<HomePage>>, ApiError> {
    let page = state.moderation_service().home().await?;
    Ok(Json(
        ApiResponse::success(page).with_notice(take_notice(&session).await),
    ))
}

/// GET /stories?category=
pub async fn list_stories(
    State(state): State<Arc<AppState>>,
    session: Session,
    Query(query): Query<StoryQuery>,
) -> Result<Json<ApiResponse<StoriesPage>>, ApiError> {
    let category = normalize_category_filter(query.category.as_deref());
    let stories = state.moderation_service().list_approved(category).await?;
    let categories = state.moderation_service().category_facets().await?;

    Ok(Json(
        ApiResponse::success(StoriesPage {
            category: category.map(ToString::to_string),
            stories,
            categories,
        })
        .with_notice(take_notice(&session).await),
    ))
}

/// GET /stories/{id}
pub async fn get_story(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<StoryDetail>>, ApiError> {
    let story_id = StoryId::new(id);
    let viewer = session_user_id(&session).await;

    let detail = state
        .moderation_service()
        .get_approved(story_id, viewer)
        .await?;

    Ok(Json(
        ApiResponse::success(detail).with_notice(take_notice(&session).await),
    ))
}

/// GET /categories
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<String>>>, ApiError> {
    let categories = state.moderation_service().categories().await?;
    Ok(Json(ApiResponse::success(categories)))
}

/// GET /submit
pub async fn submit_page(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Json<ApiResponse<SubmitPage>>, ApiError> {
    let categories = state.moderation_service().categories().await?;
    Ok(Json(
        ApiResponse::success(SubmitPage { categories })
            .with_notice(take_notice(&session).await),
    ))
}

/// POST /submit
///
/// Multipart fields: `title`, `category`, `content` and an optional `image` file.
pub async fn submit(
    State(state): State<Arc<AppState>>,
    session: Session,
    Extension(user): Extension<CurrentUser>,
    multipart: Multipart,
) -> Result<Redirect, ApiError> {
    let submission = read_submission(multipart).await?;

    match state.moderation_service().submit(user.id, submission).await {
        Ok(story) => {
            tracing::info!(story_id = %story.id, user_id = %user.id, "Story submitted");
            Ok(redirect_with_notice(
                &session,
                PROFILE,
                "Story submitted! It will appear once an admin approves it.",
            )
            .await)
        }
        Err(ModerationError::Validation(msg)) => {
            Ok(redirect_with_notice(&session, SUBMIT, msg).await)
        }
        Err(e) => Err(e.into()),
    }
}

async fn read_submission(mut multipart: Multipart) -> Result<Submission, ApiError> {
    let mut submission = Submission::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("Malformed form data: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "image" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::validation(format!("Failed to read image: {e}")))?;

                if !bytes.is_empty() {
                    submission.image = Some(ImageUpload {
                        filename,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            "title" | "category" | "content" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::validation(format!("Failed to read {name}: {e}")))?;

                match name.as_str() {
                    "title" => submission.title = value,
                    "category" => submission.category = value,
                    _ => submission.content = value,
                }
            }
            _ => {}
        }
    }

    Ok(submission)
}
