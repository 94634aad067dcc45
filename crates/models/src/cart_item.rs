use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{cart, errors, product};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cart_item")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub cart_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub subtotal: i64,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Cart,
    Product,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Cart => Entity::belongs_to(cart::Entity)
                .from(Column::CartId)
                .to(cart::Column::Id)
                .into(),
            Relation::Product => Entity::belongs_to(product::Entity)
                .from(Column::ProductId)
                .to(product::Column::Id)
                .into(),
        }
    }
}

impl Related<cart::Entity> for Entity {
    fn to() -> RelationDef { Relation::Cart.def() }
}

impl Related<product::Entity> for Entity {
    fn to() -> RelationDef { Relation::Product.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_quantity(quantity: i32) -> Result<(), errors::ModelError> {
    if quantity < 1 {
        return Err(errors::ModelError::Validation("quantity must be >= 1".into()));
    }
    Ok(())
}
