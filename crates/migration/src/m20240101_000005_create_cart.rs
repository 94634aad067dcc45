//! Create `cart` table with FK to `user`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Cart::Table)
                    .if_not_exists()
                    .col(pk_auto(Cart::Id))
                    .col(integer(Cart::UserId).not_null())
                    .col(big_integer(Cart::TotalAmount).not_null())
                    .col(timestamp_with_time_zone(Cart::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cart_user")
                            .from(Cart::Table, Cart::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Cart::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Cart { Table, Id, UserId, TotalAmount, CreatedAt }

#[derive(DeriveIden)]
enum User { Table, Id }
