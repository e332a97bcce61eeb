use crate::entities::{categories, prelude::*};
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::{OnConflict, Query};

#[derive(DeriveMigrationName)]
pub struct Migration;

const SEED_CATEGORIES: &[&str] = &[
    "Food",
    "Music",
    "Dance",
    "Traditions",
    "History",
    "Art",
    "Language",
    "Fashion",
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut insert = Query::insert();
        insert
            .into_table(Categories)
            .columns([categories::Column::Name])
            .on_conflict(
                OnConflict::column(categories::Column::Name)
                    .do_nothing()
                    .to_owned(),
            );

        for name in SEED_CATEGORIES {
            insert.values_panic([(*name).into()]);
        }

        manager.exec_stmt(insert.to_owned()).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let delete = Query::delete()
            .from_table(Categories)
            .and_where(Expr::col(categories::Column::Name).is_in(SEED_CATEGORIES.iter().copied()))
            .to_owned();

        manager.exec_stmt(delete).await?;

        Ok(())
    }
}
