use sea_orm_migration::{prelude::*, schema::*};

use crate::m20250301_000001_create_users_and_catalog::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create cart_items table
        manager
            .create_table(
                Table::create()
                    .table(CartItems::Table)
                    .if_not_exists()
                    .col(pk_auto(CartItems::Id))
                    .col(integer(CartItems::UserId))
                    .col(string_len(CartItems::ItemType, 16))
                    .col(integer(CartItems::ItemId))
                    .col(integer(CartItems::Quantity).default(1))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cart_items_user")
                            .from(CartItems::Table, CartItems::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // The cart upsert targets this index; one row per owner and item.
        manager
            .create_index(
                Index::create()
                    .name("idx_cart_items_owner_item")
                    .table(CartItems::Table)
                    .col(CartItems::UserId)
                    .col(CartItems::ItemType)
                    .col(CartItems::ItemId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create purchases table
        manager
            .create_table(
                Table::create()
                    .table(Purchases::Table)
                    .if_not_exists()
                    .col(pk_auto(Purchases::Id))
                    .col(integer(Purchases::UserId))
                    .col(string_len(Purchases::ItemType, 16))
                    .col(integer(Purchases::ItemId))
                    .col(integer(Purchases::Quantity))
                    .col(decimal(Purchases::TotalPrice).decimal_len(16, 4))
                    .col(date_time(Purchases::PurchaseDate))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_purchases_user")
                            .from(Purchases::Table, Purchases::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create requests table
        manager
            .create_table(
                Table::create()
                    .table(Requests::Table)
                    .if_not_exists()
                    .col(pk_auto(Requests::Id))
                    .col(integer(Requests::UserId))
                    .col(string(Requests::Title))
                    .col(text(Requests::Description))
                    .col(string_len(Requests::Status, 16).default("pending"))
                    .col(date(Requests::PostedDate))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_requests_user")
                            .from(Requests::Table, Requests::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order to avoid foreign key constraints
        manager
            .drop_table(Table::drop().table(Requests::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Purchases::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(CartItems::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum CartItems {
    Table,
    Id,
    UserId,
    ItemType,
    ItemId,
    Quantity,
}

#[derive(DeriveIden)]
enum Purchases {
    Table,
    Id,
    UserId,
    ItemType,
    ItemId,
    Quantity,
    TotalPrice,
    PurchaseDate,
}

#[derive(DeriveIden)]
enum Requests {
    Table,
    Id,
    UserId,
    Title,
    Description,
    Status,
    PostedDate,
}
