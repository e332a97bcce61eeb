use axum::{
    Extension, Form, Json,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tower_sessions::Session;

use super::notice::{redirect_with_notice, take_notice};
use super::types::{LoginForm, ProfilePage, RegisterForm};
use super::{ApiError, ApiResponse, AppState};
use crate::constants::routes::{HOME, LOGIN, REGISTER};
use crate::constants::session::USER_ID;
use crate::domain::UserId;
use crate::services::AccountError;

/// Identity resolved by [`require_login`] and handed to gated handlers.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: UserId,
    pub username: String,
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::Validation(msg) => ApiError::validation(msg),
            AccountError::UsernameTaken => ApiError::validation("username taken"),
            AccountError::InvalidCredentials => {
                ApiError::Unauthorized("invalid username and/or password".to_string())
            }
            AccountError::UserNotFound => ApiError::NotFound("User not found".to_string()),
            AccountError::Database(msg) => ApiError::database(msg),
            AccountError::Internal(msg) => ApiError::internal(msg),
        }
    }
}

// ============================================================================
// Middleware
// ============================================================================

/// Lets the request through only when the session names an existing user.
pub async fn require_login(
    State(state): State<Arc<AppState>>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(id) = session_user_id(&session).await else {
        return redirect_with_notice(&session, LOGIN, "Please log in to continue")
            .await
            .into_response();
    };

    match state.account_service().current_user(id).await {
        Ok(Some(user)) => {
            tracing::Span::current().record("user_id", user.id.value());
            request.extensions_mut().insert(CurrentUser {
                id: user.id,
                username: user.username,
            });
            next.run(request).await
        }
        Ok(None) => {
            // Account vanished under a live session.
            if let Err(e) = session.remove::<i32>(USER_ID).await {
                tracing::warn!(error = %e, "Failed to clear stale session identity");
            }
            redirect_with_notice(&session, LOGIN, "Please log in to continue")
                .await
                .into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Must run after [`require_login`]. Looks the role up again on every request.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    session: Session,
    Extension(user): Extension<CurrentUser>,
    request: Request,
    next: Next,
) -> Response {
    match state.account_service().role_of(user.id).await {
        Ok(Some(role)) if role.is_admin() => next.run(request).await,
        Ok(_) => {
            tracing::warn!(user_id = %user.id, "Refused admin route");
            redirect_with_notice(&session, HOME, "Access denied")
                .await
                .into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /login
pub async fn login_page(session: Session) -> Json<ApiResponse<()>> {
    Json(ApiResponse::empty().with_notice(take_notice(&session).await))
}

/// GET /register
pub async fn register_page(session: Session) -> Json<ApiResponse<()>> {
    Json(ApiResponse::empty().with_notice(take_notice(&session).await))
}

/// POST /register
pub async fn register(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Redirect, ApiError> {
    match state
        .account_service()
        .register(&form.username, &form.password, &form.confirmation)
        .await
    {
        Ok(_) => Ok(redirect_with_notice(&session, LOGIN, "Registered! Please log in.").await),
        Err(e @ (AccountError::Validation(_) | AccountError::UsernameTaken)) => {
            Ok(redirect_with_notice(&session, REGISTER, e.to_string()).await)
        }
        Err(e) => Err(e.into()),
    }
}

/// POST /login
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Redirect, ApiError> {
    let user = match state
        .account_service()
        .login(&form.username, &form.password)
        .await
    {
        Ok(user) => user,
        Err(e @ AccountError::InvalidCredentials) => {
            return Ok(redirect_with_notice(&session, LOGIN, e.to_string()).await);
        }
        Err(e) => return Err(e.into()),
    };

    session.cycle_id().await?;
    session.insert(USER_ID, user.id.value()).await?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(redirect_with_notice(&session, HOME, format!("Welcome back, {}!", user.username)).await)
}

/// POST /logout
pub async fn logout(session: Session) -> Redirect {
    if let Err(e) = session.flush().await {
        tracing::warn!(error = %e, "Failed to flush session");
    }
    Redirect::to(HOME)
}

/// GET /profile
pub async fn profile(
    State(state): State<Arc<AppState>>,
    session: Session,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<ProfilePage>>, ApiError> {
    let info = state
        .account_service()
        .current_user(user.id)
        .await?
        .ok_or(AccountError::UserNotFound)?;

    let stories = state
        .moderation_service()
        .list_for_author(user.id)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(
        ApiResponse::success(ProfilePage {
            user: info,
            stories,
        })
        .with_notice(take_notice(&session).await),
    ))
}

// ============================================================================
// Helpers
// ============================================================================

/// Identity stored by a successful login, if any.
pub async fn session_user_id(session: &Session) -> Option<UserId> {
    session
        .get::<i32>(USER_ID)
        .await
        .ok()
        .flatten()
        .map(UserId::new)
}

