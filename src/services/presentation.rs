//! Read-side assembly of stored rows into display records.
//!
//! Nothing in here touches the store; callers fetch rows and counts and
//! hand them over. The output types are what the renderer consumes.

use crate::config::PresentationConfig;
use crate::constants::TIMESTAMP_FORMAT;
use crate::db::{CategoryCount, CommentRow, StoryRow};
use crate::domain::{StoryId, StoryState, UserId};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// A timestamp as shown to the renderer.
///
/// Stored text in `YYYY-MM-DD HH:MM:SS` becomes `Parsed`; anything else is
/// passed through unchanged as `Raw`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DisplayTime {
    Parsed(NaiveDateTime),
    Raw(String),
}

#[must_use]
pub fn normalize_timestamp(raw: &str) -> DisplayTime {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .map_or_else(|_| DisplayTime::Raw(raw.to_string()), DisplayTime::Parsed)
}

/// Category -> default image table with a mandatory fallback.
#[derive(Debug, Clone)]
pub struct ImageDefaults {
    by_category: BTreeMap<String, String>,
    fallback: String,
}

impl ImageDefaults {
    #[must_use]
    pub const fn new(by_category: BTreeMap<String, String>, fallback: String) -> Self {
        Self {
            by_category,
            fallback,
        }
    }

    /// Returns the stored reference when present, otherwise the category
    /// default, otherwise the fallback.
    #[must_use]
    pub fn resolve(&self, image_path: Option<&str>, category: &str) -> String {
        match image_path.map(str::trim) {
            Some(path) if !path.is_empty() => path.to_string(),
            _ => self
                .by_category
                .get(category)
                .unwrap_or(&self.fallback)
                .clone(),
        }
    }
}

/// Cuts `content` to at most `max_chars` characters, appending an ellipsis
/// when anything was dropped.
#[must_use]
pub fn excerpt(content: &str, max_chars: usize) -> String {
    let trimmed = content.trim();
    match trimmed.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}…", trimmed[..byte_idx].trim_end()),
        None => trimmed.to_string(),
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StoryView {
    pub id: StoryId,
    pub author_id: UserId,
    pub author: String,
    pub title: String,
    pub category: String,
    pub content: String,
    pub excerpt: String,
    pub image: String,
    pub state: StoryState,
    pub created_at: DisplayTime,
    pub likes: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CommentView {
    pub id: i32,
    pub author: String,
    pub content: String,
    pub created_at: DisplayTime,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CategoryFacet {
    pub name: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoryDetail {
    pub story: StoryView,
    pub comments: Vec<CommentView>,
    pub viewer_has_liked: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct HomePage {
    pub featured: Vec<StoryView>,
    pub latest: Vec<StoryView>,
    pub categories: Vec<CategoryFacet>,
}

#[derive(Debug, Clone)]
pub struct Assembler {
    images: ImageDefaults,
    excerpt_chars: usize,
}

impl Assembler {
    #[must_use]
    pub fn from_config(config: &PresentationConfig) -> Self {
        Self {
            images: ImageDefaults::new(
                config.default_images.clone(),
                config.fallback_image.clone(),
            ),
            excerpt_chars: config.excerpt_chars,
        }
    }

    #[must_use]
    pub fn story(&self, row: StoryRow, likes: u64) -> StoryView {
        StoryView {
            id: StoryId::new(row.id),
            author_id: UserId::new(row.user_id),
            image: self.images.resolve(row.image_path.as_deref(), &row.category),
            excerpt: excerpt(&row.content, self.excerpt_chars),
            created_at: normalize_timestamp(&row.created_at),
            state: StoryState::from_flag(row.approved),
            author: row.author,
            title: row.title,
            category: row.category,
            content: row.content,
            likes,
        }
    }

    /// Missing entries in `like_counts` mean zero likes.
    #[must_use]
    pub fn stories(&self, rows: Vec<StoryRow>, like_counts: &HashMap<i32, u64>) -> Vec<StoryView> {
        rows.into_iter()
            .map(|row| {
                let likes = like_counts.get(&row.id).copied().unwrap_or(0);
                self.story(row, likes)
            })
            .collect()
    }

    #[must_use]
    pub fn comment(row: CommentRow) -> CommentView {
        CommentView {
            id: row.id,
            author: row.author,
            created_at: normalize_timestamp(&row.created_at),
            content: row.content,
        }
    }

    #[must_use]
    pub fn facets(counts: Vec<CategoryCount>) -> Vec<CategoryFacet> {
        counts
            .into_iter()
            .map(|c| CategoryFacet {
                name: c.category,
                count: u64::try_from(c.count).unwrap_or(0),
            })
            .collect()
    }
}
