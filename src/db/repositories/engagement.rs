use crate::constants::now_timestamp;
use crate::entities::{comments, likes, prelude::*, users};
use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, sea_query::OnConflict,
};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRow {
    pub id: i32,
    pub story_id: i32,
    pub user_id: i32,
    pub author: String,
    pub content: String,
    pub created_at: String,
}

impl CommentRow {
    fn from_pair((comment, author): (comments::Model, Option<users::Model>)) -> Self {
        Self {
            id: comment.id,
            story_id: comment.story_id,
            user_id: comment.user_id,
            author: author.map_or_else(|| "unknown".to_string(), |u| u.username),
            content: comment.content,
            created_at: comment.created_at,
        }
    }
}

/// Likes and comments.
pub struct EngagementRepository {
    conn: DatabaseConnection,
}

impl EngagementRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Records a like. Returns `false` when the pair already existed; the
    /// primary key on (user_id, story_id) resolves concurrent duplicates.
    pub async fn like(&self, user_id: i32, story_id: i32) -> Result<bool> {
        let active_model = likes::ActiveModel {
            user_id: Set(user_id),
            story_id: Set(story_id),
        };

        let inserted = Likes::insert(active_model)
            .on_conflict(
                OnConflict::columns([likes::Column::UserId, likes::Column::StoryId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await?;

        Ok(inserted > 0)
    }

    pub async fn like_count(&self, story_id: i32) -> Result<u64> {
        let count = Likes::find()
            .filter(likes::Column::StoryId.eq(story_id))
            .count(&self.conn)
            .await?;

        Ok(count)
    }

    /// Like counts for several stories in one grouped query. Stories without
    /// likes are absent from the map.
    pub async fn like_counts(&self, story_ids: &[i32]) -> Result<HashMap<i32, u64>> {
        if story_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let results: Vec<(i32, i64)> = Likes::find()
            .select_only()
            .column(likes::Column::StoryId)
            .column_as(likes::Column::StoryId.count(), "count")
            .filter(likes::Column::StoryId.is_in(story_ids.to_vec()))
            .group_by(likes::Column::StoryId)
            .into_tuple()
            .all(&self.conn)
            .await?;

        Ok(results
            .into_iter()
            .map(|(id, count)| (id, u64::try_from(count).unwrap_or_default()))
            .collect())
    }

    pub async fn has_liked(&self, user_id: i32, story_id: i32) -> Result<bool> {
        let found = Likes::find_by_id((user_id, story_id))
            .one(&self.conn)
            .await?;

        Ok(found.is_some())
    }

    pub async fn add_comment(&self, user_id: i32, story_id: i32, content: &str) -> Result<CommentRow> {
        let active = comments::ActiveModel {
            user_id: Set(user_id),
            story_id: Set(story_id),
            content: Set(content.to_string()),
            created_at: Set(now_timestamp()),
            ..Default::default()
        };

        let model = active.insert(&self.conn).await?;
        let author = Users::find_by_id(model.user_id).one(&self.conn).await?;

        Ok(CommentRow::from_pair((model, author)))
    }

    /// Comments on a story, oldest first.
    pub async fn comments_for(&self, story_id: i32) -> Result<Vec<CommentRow>> {
        let rows = Comments::find()
            .filter(comments::Column::StoryId.eq(story_id))
            .order_by_asc(comments::Column::CreatedAt)
            .order_by_asc(comments::Column::Id)
            .find_also_related(Users)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(CommentRow::from_pair).collect())
    }
}
