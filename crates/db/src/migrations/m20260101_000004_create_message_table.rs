//! Create message table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Message::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Message::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Message::MessageType)
                            .string_len(16)
                            .not_null()
                            .default("notification"),
                    )
                    .col(ColumnDef::new(Message::Subject).string_len(512))
                    .col(ColumnDef::new(Message::Body).text().not_null())
                    .col(ColumnDef::new(Message::AuthorId).string_len(32))
                    .col(ColumnDef::new(Message::ResModel).string_len(128))
                    .col(ColumnDef::new(Message::ResId).big_integer())
                    .col(
                        ColumnDef::new(Message::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_message_author")
                            .from(Message::Table, Message::AuthorId)
                            .to(Partner::Table, Partner::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (res_model, res_id) (document thread lookup)
        manager
            .create_index(
                Index::create()
                    .name("idx_message_res_model_res_id")
                    .table(Message::Table)
                    .col(Message::ResModel)
                    .col(Message::ResId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Message::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Message {
    Table,
    Id,
    MessageType,
    Subject,
    Body,
    AuthorId,
    ResModel,
    ResId,
    CreatedAt,
}

#[derive(Iden)]
enum Partner {
    Table,
    Id,
}
