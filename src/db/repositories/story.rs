use crate::constants::now_timestamp;
use crate::entities::{prelude::*, stories, users};
use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set,
};

/// A story joined with its author's username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryRow {
    pub id: i32,
    pub user_id: i32,
    pub author: String,
    pub title: String,
    pub category: String,
    pub content: String,
    pub image_path: Option<String>,
    pub approved: bool,
    pub created_at: String,
}

impl StoryRow {
    fn from_pair((story, author): (stories::Model, Option<users::Model>)) -> Self {
        Self {
            id: story.id,
            user_id: story.user_id,
            author: author.map_or_else(|| "unknown".to_string(), |u| u.username),
            title: story.title,
            category: story.category,
            content: story.content,
            image_path: story.image_path,
            approved: story.approved,
            created_at: story.created_at,
        }
    }
}

/// Approved-story count for one category.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

pub struct NewStory<'a> {
    pub user_id: i32,
    pub title: &'a str,
    pub category: &'a str,
    pub content: &'a str,
    pub image_path: Option<String>,
}

pub struct StoryRepository {
    conn: DatabaseConnection,
}

impl StoryRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Every new story starts pending; there is no way to insert an approved one.
    pub async fn create(&self, story: NewStory<'_>) -> Result<StoryRow> {
        let active = stories::ActiveModel {
            user_id: Set(story.user_id),
            title: Set(story.title.to_string()),
            category: Set(story.category.to_string()),
            content: Set(story.content.to_string()),
            image_path: Set(story.image_path),
            approved: Set(false),
            created_at: Set(now_timestamp()),
            ..Default::default()
        };

        let model = active.insert(&self.conn).await?;
        let author = Users::find_by_id(model.user_id).one(&self.conn).await?;

        Ok(StoryRow::from_pair((model, author)))
    }

    pub async fn get(&self, id: i32) -> Result<Option<StoryRow>> {
        let row = Stories::find_by_id(id)
            .find_also_related(Users)
            .one(&self.conn)
            .await?;

        Ok(row.map(StoryRow::from_pair))
    }

    pub async fn exists(&self, id: i32) -> Result<bool> {
        let count = Stories::find_by_id(id).count(&self.conn).await?;
        Ok(count > 0)
    }

    /// Flips the approval flag. Returns the number of matched rows, which is
    /// zero for an unknown id.
    pub async fn approve(&self, id: i32) -> Result<u64> {
        let result = Stories::update_many()
            .col_expr(
                stories::Column::Approved,
                sea_orm::sea_query::Expr::value(true),
            )
            .filter(stories::Column::Id.eq(id))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected)
    }

    /// Approved stories, newest first.
    pub async fn list_approved(
        &self,
        category: Option<&str>,
        limit: Option<u64>,
    ) -> Result<Vec<StoryRow>> {
        let mut query = Stories::find().filter(stories::Column::Approved.eq(true));

        if let Some(category) = category {
            query = query.filter(stories::Column::Category.eq(category));
        }

        let query = query
            .order_by_desc(stories::Column::CreatedAt)
            .order_by_desc(stories::Column::Id)
            .limit(limit);

        self.fetch_with_authors(query).await
    }

    /// Pending stories, oldest first.
    pub async fn list_pending(&self) -> Result<Vec<StoryRow>> {
        let query = Stories::find()
            .filter(stories::Column::Approved.eq(false))
            .order_by_asc(stories::Column::CreatedAt)
            .order_by_asc(stories::Column::Id);

        self.fetch_with_authors(query).await
    }

    pub async fn list_for_author(&self, user_id: i32) -> Result<Vec<StoryRow>> {
        let query = Stories::find()
            .filter(stories::Column::UserId.eq(user_id))
            .order_by_desc(stories::Column::CreatedAt)
            .order_by_desc(stories::Column::Id);

        self.fetch_with_authors(query).await
    }

    pub async fn category_counts(&self) -> Result<Vec<CategoryCount>> {
        let counts = Stories::find()
            .select_only()
            .column(stories::Column::Category)
            .column_as(stories::Column::Id.count(), "count")
            .filter(stories::Column::Approved.eq(true))
            .group_by(stories::Column::Category)
            .order_by_asc(stories::Column::Category)
            .into_model::<CategoryCount>()
            .all(&self.conn)
            .await?;

        Ok(counts)
    }

    async fn fetch_with_authors(&self, query: Select<Stories>) -> Result<Vec<StoryRow>> {
        let rows = query.find_also_related(Users).all(&self.conn).await?;
        Ok(rows.into_iter().map(StoryRow::from_pair).collect())
    }
}
