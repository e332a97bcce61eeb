pub mod image;
pub use image::{ImageStore, ImageUpload};

pub mod presentation;
pub use presentation::Assembler;

pub mod account_service;
pub mod account_service_impl;
pub use account_service::{AccountError, AccountService, UserInfo};
pub use account_service_impl::SeaOrmAccountService;

pub mod moderation_service;
pub mod moderation_service_impl;
pub use moderation_service::{ApproveOutcome, ModerationError, ModerationService, Submission};
pub use moderation_service_impl::SeaOrmModerationService;

pub mod engagement_service;
pub mod engagement_service_impl;
pub use engagement_service::{EngagementError, EngagementService, LikeOutcome};
pub use engagement_service_impl::SeaOrmEngagementService;
