use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Connections::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Connections::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Connections::RequesterId).uuid().not_null())
                    .col(ColumnDef::new(Connections::ReceiverId).uuid().not_null())
                    .col(ColumnDef::new(Connections::Status).string().not_null())
                    .col(ColumnDef::new(Connections::Message).text())
                    .col(
                        ColumnDef::new(Connections::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Connections::RespondedAt).timestamp_with_time_zone(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_connections_requester")
                            .from(Connections::Table, Connections::RequesterId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_connections_receiver")
                            .from(Connections::Table, Connections::ReceiverId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // At most one edge per ordered pair; concurrent duplicate sends
        // collapse into a constraint violation instead of a second row.
        manager
            .create_index(
                Index::create()
                    .name("uq_connections_edge")
                    .table(Connections::Table)
                    .col(Connections::RequesterId)
                    .col(Connections::ReceiverId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_connections_receiver_status")
                    .table(Connections::Table)
                    .col(Connections::ReceiverId)
                    .col(Connections::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Connections::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Connections {
    Table,
    Id,
    RequesterId,
    ReceiverId,
    Status,
    Message,
    CreatedAt,
    RespondedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
