//! One-shot user-visible notices carried in the session.

use axum::response::Redirect;
use tower_sessions::Session;
use tracing::warn;

use crate::constants::session::NOTICE;

pub async fn set_notice(session: &Session, message: impl Into<String>) {
    if let Err(e) = session.insert(NOTICE, message.into()).await {
        warn!(error = %e, "Failed to store notice in session");
    }
}

/// Returns and clears the pending notice.
pub async fn take_notice(session: &Session) -> Option<String> {
    session.remove::<String>(NOTICE).await.ok().flatten()
}

pub async fn redirect_with_notice(
    session: &Session,
    to: &str,
    message: impl Into<String>,
) -> Redirect {
    set_notice(session, message).await;
    Redirect::to(to)
}
