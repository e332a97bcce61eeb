use serde::{Deserialize, Serialize};

use crate::services::UserInfo;
use crate::services::presentation::{CategoryFacet, StoryView};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// One-shot message carried over from the previous request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            notice: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            notice: None,
        }
    }

    #[must_use]
    pub fn with_notice(mut self, notice: Option<String>) -> Self {
        self.notice = notice;
        self
    }
}

impl ApiResponse<()> {
    /// A page with nothing but an optional notice, e.g. the login form.
    pub const fn empty() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
            notice: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirmation: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CommentForm {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct StoryQuery {
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StoriesPage {
    pub category: Option<String>,
    pub stories: Vec<StoryView>,
    pub categories: Vec<CategoryFacet>,
}

#[derive(Debug, Serialize)]
pub struct SubmitPage {
    pub categories: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ProfilePage {
    pub user: UserInfo,
    pub stories: Vec<StoryView>,
}

#[derive(Debug, Serialize)]
pub struct PendingPage {
    pub stories: Vec<StoryView>,
}
