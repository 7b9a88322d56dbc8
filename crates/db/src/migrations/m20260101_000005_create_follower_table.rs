//! Create follower and follower_subtype tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Follower::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Follower::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Follower::ResModel)
                            .string_len(128)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Follower::ResId).big_integer().not_null())
                    .col(ColumnDef::new(Follower::PartnerId).string_len(32).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_follower_partner")
                            .from(Follower::Table, Follower::PartnerId)
                            .to(Partner::Table, Partner::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (res_model, res_id) (follower listing per document)
        manager
            .create_index(
                Index::create()
                    .name("idx_follower_res_model_res_id")
                    .table(Follower::Table)
                    .col(Follower::ResModel)
                    .col(Follower::ResId)
                    .to_owned(),
            )
            .await?;

        // Index: partner_id (subscriptions of a partner)
        manager
            .create_index(
                Index::create()
                    .name("idx_follower_partner_id")
                    .table(Follower::Table)
                    .col(Follower::PartnerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FollowerSubtype::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FollowerSubtype::FollowerId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FollowerSubtype::SubtypeId)
                            .string_len(32)
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(FollowerSubtype::FollowerId)
                            .col(FollowerSubtype::SubtypeId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_follower_subtype_follower")
                            .from(FollowerSubtype::Table, FollowerSubtype::FollowerId)
                            .to(Follower::Table, Follower::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_follower_subtype_subtype")
                            .from(FollowerSubtype::Table, FollowerSubtype::SubtypeId)
                            .to(MessageSubtype::Table, MessageSubtype::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FollowerSubtype::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Follower::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Follower {
    Table,
    Id,
    ResModel,
    ResId,
    PartnerId,
}

#[derive(Iden)]
enum FollowerSubtype {
    Table,
    FollowerId,
    SubtypeId,
}

#[derive(Iden)]
enum Partner {
    Table,
    Id,
}

#[derive(Iden)]
enum MessageSubtype {
    Table,
    Id,
}
