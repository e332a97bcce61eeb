use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AccountService, Assembler, EngagementService, ImageStore, ModerationService,
    SeaOrmAccountService, SeaOrmEngagementService, SeaOrmModerationService,
};

/// Process-wide state built once at startup and read-only afterwards.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub images: Arc<ImageStore>,

    pub account_service: Arc<dyn AccountService>,

    pub moderation_service: Arc<dyn ModerationService>,

    pub engagement_service: Arc<dyn EngagementService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Ok(Self::with_store(config, store))
    }

    #[must_use]
    pub fn with_store(config: Config, store: Store) -> Self {
        let images = Arc::new(ImageStore::new(&config.uploads.path));
        let assembler = Arc::new(Assembler::from_config(&config.presentation));

        let account_service = Arc::new(SeaOrmAccountService::new(
            store.clone(),
            config.security.clone(),
        )) as Arc<dyn AccountService>;

        let moderation_service = Arc::new(SeaOrmModerationService::new(
            store.clone(),
            images.clone(),
            assembler,
            config.presentation.featured_limit,
            config.presentation.latest_limit,
        )) as Arc<dyn ModerationService>;

        let engagement_service = Arc::new(SeaOrmEngagementService::new(store.clone()))
            as Arc<dyn EngagementService>;

        Self {
            config: Arc::new(config),
            store,
            images,
            account_service,
            moderation_service,
            engagement_service,
        }
    }
}
