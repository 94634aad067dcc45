use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Product: title is the listing search column
        manager
            .create_index(
                Index::create()
                    .name("idx_product_title")
                    .table(Product::Table)
                    .col(Product::Title)
                    .to_owned(),
            )
            .await?;

        // Product: index on category_id
        manager
            .create_index(
                Index::create()
                    .name("idx_product_category")
                    .table(Product::Table)
                    .col(Product::CategoryId)
                    .to_owned(),
            )
            .await?;

        // Cart: index on user_id
        manager
            .create_index(
                Index::create()
                    .name("idx_cart_user")
                    .table(Cart::Table)
                    .col(Cart::UserId)
                    .to_owned(),
            )
            .await?;

        // CartItem: index on cart_id
        manager
            .create_index(
                Index::create()
                    .name("idx_cart_item_cart")
                    .table(CartItem::Table)
                    .col(CartItem::CartId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_product_title").table(Product::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_product_category").table(Product::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_cart_user").table(Cart::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_cart_item_cart").table(CartItem::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Product { Table, Title, CategoryId }

#[derive(DeriveIden)]
enum Cart { Table, UserId }

#[derive(DeriveIden)]
enum CartItem { Table, CartId }
