//! Create partner table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Partner::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Partner::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Partner::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Partner::Email).string_len(256))
                    .col(
                        ColumnDef::new(Partner::NotifyEmail)
                            .string_len(16)
                            .not_null()
                            .default("all"),
                    )
                    .col(
                        ColumnDef::new(Partner::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Partner::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Partner {
    Table,
    Id,
    Name,
    Email,
    NotifyEmail,
    CreatedAt,
}
