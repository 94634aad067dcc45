//! Create `cart_item` table with FKs to `cart` and `product`.
//!
//! Items go away with their cart, and with a deleted product.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CartItem::Table)
                    .if_not_exists()
                    .col(pk_auto(CartItem::Id))
                    .col(integer(CartItem::CartId).not_null())
                    .col(integer(CartItem::ProductId).not_null())
                    .col(integer(CartItem::Quantity).not_null())
                    .col(big_integer(CartItem::Subtotal).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cart_item_cart")
                            .from(CartItem::Table, CartItem::CartId)
                            .to(Cart::Table, Cart::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cart_item_product")
                            .from(CartItem::Table, CartItem::ProductId)
                            .to(Product::Table, Product::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(CartItem::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum CartItem { Table, Id, CartId, ProductId, Quantity, Subtotal }

#[derive(DeriveIden)]
enum Cart { Table, Id }

#[derive(DeriveIden)]
enum Product { Table, Id }
