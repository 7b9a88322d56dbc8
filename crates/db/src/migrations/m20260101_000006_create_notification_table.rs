//! Create notification table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Notification::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notification::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Notification::PartnerId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Notification::MessageId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Notification::Read)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notification_partner")
                            .from(Notification::Table, Notification::PartnerId)
                            .to(Partner::Table, Partner::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notification_message")
                            .from(Notification::Table, Notification::MessageId)
                            .to(Message::Table, Message::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Composite index: (partner_id, read, message_id) accelerates
        // read-state queries and the unread counters.
        manager
            .create_index(
                Index::create()
                    .name("idx_notification_partner_read_message")
                    .table(Notification::Table)
                    .col(Notification::PartnerId)
                    .col(Notification::Read)
                    .col(Notification::MessageId)
                    .to_owned(),
            )
            .await?;

        // Index: message_id (notify-list computation per message)
        manager
            .create_index(
                Index::create()
                    .name("idx_notification_message_id")
                    .table(Notification::Table)
                    .col(Notification::MessageId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Notification::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Notification {
    Table,
    Id,
    PartnerId,
    MessageId,
    Read,
}

#[derive(Iden)]
enum Partner {
    Table,
    Id,
}

#[derive(Iden)]
enum Message {
    Table,
    Id,
}
