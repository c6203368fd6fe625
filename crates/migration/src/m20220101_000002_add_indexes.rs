use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Users: unique email; the only duplicate check registration has
        manager
            .create_index(
                Index::create()
                    .name("uniq_user_email")
                    .table(User::Table)
                    .col(User::Email)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Users: listing order
        manager
            .create_index(
                Index::create()
                    .name("idx_user_created_at")
                    .table(User::Table)
                    .col(User::CreatedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_user_created_at").table(User::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("uniq_user_email").table(User::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum User { Table, Email, CreatedAt }
