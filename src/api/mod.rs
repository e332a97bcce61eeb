use anyhow::Context;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{get, post},
};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_sessions::cookie::{Key, SameSite};
use tower_sessions::session_store::ExpiredDeletion;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;

use crate::config::Config;
use crate::services::{AccountService, EngagementService, ModerationService};
use crate::state::SharedState;

mod admin;
mod assets;
pub mod auth;
mod engagement;
mod error;
pub mod notice;
mod observability;
mod stories;
mod types;
mod validation;

pub use error::ApiError;
pub use types::*;

use metrics_exporter_prometheus::PrometheusHandle;

const SESSION_KEY_CONTEXT: &str = "zamculture 2024-01-01 session cookie signing";

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn account_service(&self) -> &Arc<dyn AccountService> {
        &self.shared.account_service
    }

    #[must_use]
    pub fn moderation_service(&self) -> &Arc<dyn ModerationService> {
        &self.shared.moderation_service
    }

    #[must_use]
    pub fn engagement_service(&self) -> &Arc<dyn EngagementService> {
        &self.shared.engagement_service
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

/// Derives the cookie signing key from the configured secret.
///
/// An empty secret yields a random key, so sessions end with the process.
fn session_key(secret: &str) -> Key {
    let mut bytes = [0u8; 64];

    if secret.is_empty() {
        tracing::warn!("server.secret_key is empty, sessions will not survive a restart");
        rand::rng().fill(&mut bytes[..]);
    } else {
        let mut hasher = blake3::Hasher::new_derive_key(SESSION_KEY_CONTEXT);
        hasher.update(secret.as_bytes());
        hasher.finalize_xof().fill(&mut bytes);
    }

    Key::from(&bytes)
}

/// Opens the session table on the application pool, creating it if needed,
/// and drops rows that expired while the server was down.
pub async fn session_store(state: &AppState) -> anyhow::Result<SqliteStore> {
    let store = SqliteStore::new(state.store().conn.get_sqlite_connection_pool().clone());
    store
        .migrate()
        .await
        .context("Failed to create session table")?;
    store
        .delete_expired()
        .await
        .context("Failed to delete expired sessions")?;
    Ok(store)
}

/// Deletes expired sessions every `period` until the handle is aborted.
pub fn spawn_session_pruning(store: SqliteStore, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        // The first tick fires immediately; startup already pruned.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match store.delete_expired().await {
                Ok(()) => tracing::debug!("Pruned expired sessions"),
                Err(e) => tracing::warn!(error = %e, "Failed to prune expired sessions"),
            }
        }
    })
}

pub async fn router(state: Arc<AppState>) -> anyhow::Result<Router> {
    let store = session_store(&state).await?;
    Ok(router_with_session_store(state, store))
}

pub fn router_with_session_store(state: Arc<AppState>, sessions: SqliteStore) -> Router {
    let config = state.config();
    let uploads_path = config.uploads.path.clone();
    let cors_origins = config.server.cors_allowed_origins.clone();

    let session_layer = SessionManagerLayer::new(sessions)
        .with_secure(config.server.secure_cookies)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            config.server.session_inactivity_minutes,
        )))
        .with_signed(session_key(&config.server.secret_key));

    let member_routes = create_member_router(state.clone());
    let admin_routes = create_admin_router(state.clone());

    let app_router = Router::new()
        .merge(member_routes)
        .merge(admin_routes)
        .route("/", get(stories::home))
        .route("/stories", get(stories::list_stories))
        .route("/stories/{id}", get(stories::get_story))
        .route("/categories", get(stories::list_categories))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
        .route("/health", get(observability::health))
        .layer(session_layer)
        .with_state(state.clone());

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .merge(app_router)
        .route("/static/{*path}", get(assets::serve_asset))
        .nest_service(
            "/uploads",
            tower_http::services::ServeDir::new(uploads_path),
        )
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::security_headers_middleware))
        .layer(middleware::from_fn(observability::logging_middleware))
}

/// Routes that need a logged-in user.
fn create_member_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let max_upload_bytes = state.config().uploads.max_upload_bytes;

    Router::new()
        .route("/profile", get(auth::profile))
        .route(
            "/submit",
            get(stories::submit_page)
                .post(stories::submit)
                .layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/stories/{id}/like", post(engagement::like))
        .route("/stories/{id}/comments", post(engagement::comment))
        .route_layer(middleware::from_fn_with_state(state, auth::require_login))
}

/// Routes that need an admin. The role is checked on every request.
fn create_admin_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/admin/pending", get(admin::pending))
        .route("/admin/stories/{id}/approve", post(admin::approve))
        .route("/metrics", get(observability::get_metrics))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_admin,
        ))
        .route_layer(middleware::from_fn_with_state(state, auth::require_login))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_key_is_stable_for_a_secret() {
        let a = session_key("correct horse battery staple");
        let b = session_key("correct horse battery staple");
        let c = session_key("another secret");
        assert_eq!(a.master(), b.master());
        assert_ne!(a.master(), c.master());
    }
}
