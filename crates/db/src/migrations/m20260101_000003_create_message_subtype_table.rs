//! Create message subtype table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MessageSubtype::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MessageSubtype::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MessageSubtype::Name)
                            .string_len(128)
                            .not_null(),
                    )
                    .col(ColumnDef::new(MessageSubtype::ResModel).string_len(128))
                    .col(
                        ColumnDef::new(MessageSubtype::DefaultSubscribed)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(MessageSubtype::Description).text())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MessageSubtype::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum MessageSubtype {
    Table,
    Id,
    Name,
    ResModel,
    DefaultSubscribed,
    Description,
}
