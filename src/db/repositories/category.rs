use crate::entities::{categories, prelude::*};
use anyhow::Result;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

pub struct CategoryRepository {
    conn: DatabaseConnection,
}

impl CategoryRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_names(&self) -> Result<Vec<String>> {
        let names: Vec<String> = Categories::find()
            .select_only()
            .column(categories::Column::Name)
            .order_by_asc(categories::Column::Name)
            .into_tuple()
            .all(&self.conn)
            .await?;

        Ok(names)
    }

    pub async fn exists(&self, name: &str) -> Result<bool> {
        let count = Categories::find()
            .filter(categories::Column::Name.eq(name))
            .count(&self.conn)
            .await?;

        Ok(count > 0)
    }
}
