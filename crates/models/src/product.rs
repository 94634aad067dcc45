use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{category, errors};

/// URL prefix product images are served under (tower-http ServeDir).
pub const IMAGE_BASE_PATH: &str = "/static/images/products";
/// Placeholder shown for products without an uploaded image.
pub const DEFAULT_IMAGE: &str = "default.jpg";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub price: i64,
    pub old_price: Option<i64>,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub image: Option<String>,
    pub rating: Option<f32>,
    pub category_id: Option<i32>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Category,
    CartItem,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Category => Entity::belongs_to(category::Entity)
                .from(Column::CategoryId)
                .to(category::Column::Id)
                .into(),
            Relation::CartItem => Entity::has_many(crate::cart_item::Entity).into(),
        }
    }
}

impl Related<category::Entity> for Entity {
    fn to() -> RelationDef { Relation::Category.def() }
}

impl Related<crate::cart_item::Entity> for Entity {
    fn to() -> RelationDef { Relation::CartItem.def() }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Resolve the stored filename to a servable URL, falling back to the
    /// default placeholder when no image was uploaded.
    pub fn image_url(&self) -> String {
        match self.image.as_deref() {
            Some(file) => format!("{}/{}", IMAGE_BASE_PATH, file),
            None => format!("{}/{}", IMAGE_BASE_PATH, DEFAULT_IMAGE),
        }
    }
}

pub fn validate_title(title: &str) -> Result<(), errors::ModelError> {
    if title.trim().is_empty() {
        return Err(errors::ModelError::Validation("title required".into()));
    }
    Ok(())
}

pub fn validate_price(price: i64) -> Result<(), errors::ModelError> {
    if price < 0 {
        return Err(errors::ModelError::Validation("price must be >= 0".into()));
    }
    Ok(())
}

pub fn validate_rating(rating: f32) -> Result<(), errors::ModelError> {
    if !(0.0..=5.0).contains(&rating) {
        return Err(errors::ModelError::Validation("rating must be within 0..=5".into()));
    }
    Ok(())
}

/// Insertable field set; the service layer owns the category existence check.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub title: String,
    pub price: i64,
    pub old_price: Option<i64>,
    pub description: String,
    pub image: Option<String>,
    pub rating: Option<f32>,
    pub category_id: Option<i32>,
}

pub async fn create(db: &DatabaseConnection, new: NewProduct) -> Result<Model, errors::ModelError> {
    validate_title(&new.title)?;
    validate_price(new.price)?;
    if let Some(old) = new.old_price { validate_price(old)?; }
    if let Some(r) = new.rating { validate_rating(r)?; }
    let now = Utc::now().into();
    let am = ActiveModel {
        title: Set(new.title),
        price: Set(new.price),
        old_price: Set(new.old_price),
        description: Set(new.description),
        image: Set(new.image),
        rating: Set(new.rating),
        category_id: Set(new.category_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_url_falls_back_to_default() {
        let now = chrono::Utc::now().into();
        let p = Model {
            id: 1,
            title: "Red Shoe".into(),
            price: 4999,
            old_price: None,
            description: "a shoe".into(),
            image: None,
            rating: None,
            category_id: None,
            created_at: now,
            updated_at: now,
        };
        assert_eq!(p.image_url(), "/static/images/products/default.jpg");

        let with_image = Model { image: Some("red-shoe.jpg".into()), ..p };
        assert_eq!(with_image.image_url(), "/static/images/products/red-shoe.jpg");
    }

    #[test]
    fn rating_bounds() {
        assert!(validate_rating(0.0).is_ok());
        assert!(validate_rating(5.0).is_ok());
        assert!(validate_rating(5.1).is_err());
        assert!(validate_rating(-0.1).is_err());
    }

    #[test]
    fn price_must_be_non_negative() {
        assert!(validate_price(0).is_ok());
        assert!(validate_price(-1).is_err());
    }
}
