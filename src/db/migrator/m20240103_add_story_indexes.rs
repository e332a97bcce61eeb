use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx_stories_approved_created")
                    .table(Stories::Table)
                    .col(Stories::Approved)
                    .col(Stories::CreatedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_comments_story")
                    .table(Comments::Table)
                    .col(Comments::StoryId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_comments_story")
                    .table(Comments::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_stories_approved_created")
                    .table(Stories::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Stories {
    Table,
    Approved,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Comments {
    Table,
    StoryId,
}
