use crate::config::SecurityConfig;
use crate::domain::Role;
use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use repositories::engagement::CommentRow;
pub use repositories::story::{CategoryCount, NewStory, StoryRow};
pub use repositories::user::User;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn story_repo(&self) -> repositories::story::StoryRepository {
        repositories::story::StoryRepository::new(self.conn.clone())
    }

    fn category_repo(&self) -> repositories::category::CategoryRepository {
        repositories::category::CategoryRepository::new(self.conn.clone())
    }

    fn engagement_repo(&self) -> repositories::engagement::EngagementRepository {
        repositories::engagement::EngagementRepository::new(self.conn.clone())
    }

    // ========================================================================
    // Accounts
    // ========================================================================

    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        role: Role,
        security: &SecurityConfig,
    ) -> Result<Option<User>> {
        self.user_repo()
            .create(username, password, role, security)
            .await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn get_user(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_user_role(&self, id: i32) -> Result<Option<Role>> {
        self.user_repo().get_role(id).await
    }

    pub async fn verify_user_password(&self, username: &str, password: &str) -> Result<Option<User>> {
        self.user_repo().verify_password(username, password).await
    }

    // ========================================================================
    // Stories
    // ========================================================================

    pub async fn create_story(&self, story: NewStory<'_>) -> Result<StoryRow> {
        self.story_repo().create(story).await
    }

    pub async fn get_story(&self, id: i32) -> Result<Option<StoryRow>> {
        self.story_repo().get(id).await
    }

    pub async fn story_exists(&self, id: i32) -> Result<bool> {
        self.story_repo().exists(id).await
    }

    pub async fn approve_story(&self, id: i32) -> Result<u64> {
        self.story_repo().approve(id).await
    }

    pub async fn list_approved_stories(
        &self,
        category: Option<&str>,
        limit: Option<u64>,
    ) -> Result<Vec<StoryRow>> {
        self.story_repo().list_approved(category, limit).await
    }

    pub async fn list_pending_stories(&self) -> Result<Vec<StoryRow>> {
        self.story_repo().list_pending().await
    }

    pub async fn list_stories_by_author(&self, user_id: i32) -> Result<Vec<StoryRow>> {
        self.story_repo().list_for_author(user_id).await
    }

    pub async fn approved_category_counts(&self) -> Result<Vec<CategoryCount>> {
        self.story_repo().category_counts().await
    }

    // ========================================================================
    // Categories
    // ========================================================================

    pub async fn list_categories(&self) -> Result<Vec<String>> {
        self.category_repo().list_names().await
    }

    pub async fn category_exists(&self, name: &str) -> Result<bool> {
        self.category_repo().exists(name).await
    }

    // ========================================================================
    // Likes & comments
    // ========================================================================

    pub async fn like_story(&self, user_id: i32, story_id: i32) -> Result<bool> {
        self.engagement_repo().like(user_id, story_id).await
    }

    pub async fn like_count(&self, story_id: i32) -> Result<u64> {
        self.engagement_repo().like_count(story_id).await
    }

    pub async fn like_counts(&self, story_ids: &[i32]) -> Result<HashMap<i32, u64>> {
        self.engagement_repo().like_counts(story_ids).await
    }

    pub async fn has_liked(&self, user_id: i32, story_id: i32) -> Result<bool> {
        self.engagement_repo().has_liked(user_id, story_id).await
    }

    pub async fn add_comment(&self, user_id: i32, story_id: i32, content: &str) -> Result<CommentRow> {
        self.engagement_repo()
            .add_comment(user_id, story_id, content)
            .await
    }

    pub async fn list_comments(&self, story_id: i32) -> Result<Vec<CommentRow>> {
        self.engagement_repo().comments_for(story_id).await
    }
}
