//! Create mail table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Mail::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Mail::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Mail::MessageId).string_len(32))
                    .col(
                        ColumnDef::new(Mail::EmailTo)
                            .string_len(1024)
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Mail::BodyHtml).text().not_null())
                    .col(
                        ColumnDef::new(Mail::State)
                            .string_len(16)
                            .not_null()
                            .default("outgoing"),
                    )
                    .col(
                        ColumnDef::new(Mail::AutoDelete)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Mail::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_mail_message")
                            .from(Mail::Table, Mail::MessageId)
                            .to(Message::Table, Message::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: state (outgoing queue scans)
        manager
            .create_index(
                Index::create()
                    .name("idx_mail_state")
                    .table(Mail::Table)
                    .col(Mail::State)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Mail::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Mail {
    Table,
    Id,
    MessageId,
    EmailTo,
    BodyHtml,
    State,
    AutoDelete,
    CreatedAt,
}

#[derive(Iden)]
enum Message {
    Table,
    Id,
}
