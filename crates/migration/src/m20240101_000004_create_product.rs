//! Create `product` table with FK to `category`.
//!
//! Deleting a category nullifies the reference; such products list as
//! "Uncategorized".
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Product::Table)
                    .if_not_exists()
                    .col(pk_auto(Product::Id))
                    .col(string_len(Product::Title, 255).not_null())
                    .col(big_integer(Product::Price).not_null())
                    .col(ColumnDef::new(Product::OldPrice).big_integer().null())
                    .col(text(Product::Description).not_null())
                    .col(ColumnDef::new(Product::Image).string_len(255).null())
                    .col(ColumnDef::new(Product::Rating).float().null())
                    .col(ColumnDef::new(Product::CategoryId).integer().null())
                    .col(timestamp_with_time_zone(Product::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Product::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_category")
                            .from(Product::Table, Product::CategoryId)
                            .to(Category::Table, Category::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Product::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Product {
    Table,
    Id,
    Title,
    Price,
    OldPrice,
    Description,
    Image,
    Rating,
    CategoryId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Category { Table, Id }
