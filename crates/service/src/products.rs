use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use models::{category, product};

use crate::errors::ServiceError;
use crate::pagination::Pagination;
use crate::responses::{self, Envelope};

/// Creation payload. The referenced category must exist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub title: String,
    pub price: i64,
    #[serde(default)]
    pub old_price: Option<i64>,
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub rating: Option<f32>,
    pub category_id: i32,
}

/// Full-replacement update payload: every field listed here is applied onto
/// the stored record. Internal fields (id, timestamps) are not reachable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub title: String,
    pub price: i64,
    #[serde(default)]
    pub old_price: Option<i64>,
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub category_id: Option<i32>,
}

/// Denormalized listing row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductView {
    pub id: i32,
    pub title: String,
    pub price: i64,
    pub old_price: Option<i64>,
    pub category: String,
    pub image_url: String,
    pub rating: f32,
    pub description: String,
}

fn view(p: product::Model, c: Option<category::Model>) -> ProductView {
    ProductView {
        id: p.id,
        image_url: p.image_url(),
        category: c.map(|c| c.name).unwrap_or_else(|| category::UNCATEGORIZED.to_string()),
        rating: p.rating.unwrap_or(0.0),
        title: p.title,
        price: p.price,
        old_price: p.old_price,
        description: p.description,
    }
}

/// List products whose title contains `search`, ordered by ascending id,
/// skipping `(page-1)*limit` rows and taking `limit`.
pub async fn list_products(
    db: &DatabaseConnection,
    opts: Pagination,
    search: &str,
) -> Result<Envelope<Vec<ProductView>>, ServiceError> {
    let norm = opts.normalized();
    let (offset, limit) = norm.to_offset_limit();
    let rows = product::Entity::find()
        .filter(product::Column::Title.contains(search))
        .order_by_asc(product::Column::Id)
        .find_also_related(category::Entity)
        .offset(offset)
        .limit(limit)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    let views = rows.into_iter().map(|(p, c)| view(p, c)).collect();
    Ok(responses::page_success("products", norm.page, norm.limit, views))
}

/// Get a product by id.
pub async fn get_product(db: &DatabaseConnection, id: i32) -> Result<Envelope<product::Model>, ServiceError> {
    let found = product::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("Product", id))?;
    let title = found.title.clone();
    Ok(responses::get_single_success(&title, id, found))
}

/// Create a product after verifying the referenced category exists.
pub async fn create_product(
    db: &DatabaseConnection,
    payload: ProductCreate,
) -> Result<Envelope<product::Model>, ServiceError> {
    if !category::exists(db, payload.category_id).await? {
        return Err(ServiceError::not_found("Category", payload.category_id));
    }
    let created = product::create(db, product::NewProduct {
        title: payload.title,
        price: payload.price,
        old_price: payload.old_price,
        description: payload.description,
        image: payload.image,
        rating: payload.rating,
        category_id: Some(payload.category_id),
    })
    .await?;
    info!(id = created.id, title = %created.title, "product_created");
    let title = created.title.clone();
    Ok(responses::create_success(&title, created.id, created))
}

/// Overwrite every mutable field of a product.
pub async fn update_product(
    db: &DatabaseConnection,
    id: i32,
    payload: ProductUpdate,
) -> Result<Envelope<product::Model>, ServiceError> {
    product::validate_title(&payload.title)?;
    product::validate_price(payload.price)?;
    if let Some(old) = payload.old_price { product::validate_price(old)?; }
    if let Some(r) = payload.rating { product::validate_rating(r)?; }

    let mut am: product::ActiveModel = product::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("Product", id))?
        .into();
    am.title = Set(payload.title);
    am.price = Set(payload.price);
    am.old_price = Set(payload.old_price);
    am.description = Set(payload.description);
    am.image = Set(payload.image);
    am.rating = Set(payload.rating);
    am.category_id = Set(payload.category_id);
    am.updated_at = Set(chrono::Utc::now().into());
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    info!(id = updated.id, title = %updated.title, "product_updated");
    let title = updated.title.clone();
    Ok(responses::update_success(&title, updated.id, updated))
}

/// Delete a product by id.
pub async fn delete_product(db: &DatabaseConnection, id: i32) -> Result<Envelope<product::Model>, ServiceError> {
    let found = product::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("Product", id))?;
    product::Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    info!(id, title = %found.title, "product_deleted");
    let title = found.title.clone();
    Ok(responses::delete_success(&title, id, found))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use uuid::Uuid;

    fn payload(title: &str, category_id: i32) -> ProductCreate {
        ProductCreate {
            title: title.to_string(),
            price: 4999,
            old_price: None,
            description: "test product".into(),
            image: None,
            rating: None,
            category_id,
        }
    }

    #[tokio::test]
    async fn product_crud_service() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;

        let cat = models::category::create(&db, &format!("svc_cat_{}", Uuid::new_v4())).await?;

        // Create with a valid category
        let title = format!("Svc Shoe {}", Uuid::new_v4());
        let created = create_product(&db, payload(&title, cat.id)).await?;
        assert_eq!(created.data.title, title);
        assert_eq!(created.message, format!("Created {} with id {}", title, created.data.id));

        // Retrieval round trip returns the same field values
        let fetched = get_product(&db, created.data.id).await?;
        assert_eq!(fetched.data, created.data);

        // Create with a missing category persists nothing
        let missing = create_product(&db, payload("Ghost", i32::MAX)).await;
        match missing {
            Err(ServiceError::NotFound(msg)) => {
                assert!(msg.contains("Category"));
                assert!(msg.contains(&i32::MAX.to_string()));
            }
            other => panic!("expected NotFound, got {:?}", other.map(|e| e.message)),
        }

        // Full-replacement update
        let new_title = format!("Updated {}", Uuid::new_v4());
        let updated = update_product(&db, created.data.id, ProductUpdate {
            title: new_title.clone(),
            price: 1099,
            old_price: Some(4999),
            description: "now cheaper".into(),
            image: Some("cheap.jpg".into()),
            rating: Some(3.5),
            category_id: Some(cat.id),
        }).await?;
        assert_eq!(updated.data.title, new_title);
        assert_eq!(updated.data.price, 1099);
        assert_eq!(updated.data.old_price, Some(4999));

        // Update of a missing id leaves the store unchanged
        let miss = update_product(&db, i32::MAX, ProductUpdate {
            title: "x".into(), price: 1, old_price: None, description: "x".into(),
            image: None, rating: None, category_id: None,
        }).await;
        assert!(matches!(miss, Err(ServiceError::NotFound(_))));

        // Delete, then retrieval misses
        let deleted = delete_product(&db, created.data.id).await?;
        assert_eq!(deleted.data.id, created.data.id);
        let gone = get_product(&db, created.data.id).await;
        assert!(matches!(gone, Err(ServiceError::NotFound(_))));
        let gone_again = delete_product(&db, created.data.id).await;
        assert!(matches!(gone_again, Err(ServiceError::NotFound(_))));

        models::category::Entity::delete_by_id(cat.id).exec(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn listing_filters_and_paginates() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;

        let cat = models::category::create(&db, &format!("list_cat_{}", Uuid::new_v4())).await?;

        // Unique marker keeps this run isolated from other rows
        let marker = Uuid::new_v4().simple().to_string();
        let titles = [
            format!("{} Red Shoe", marker),
            format!("{} Blue Shoe", marker),
            format!("{} Red Hat", marker),
        ];
        let mut ids = vec![];
        for t in &titles {
            let env = create_product(&db, payload(t, cat.id)).await?;
            ids.push(env.data.id);
        }

        // Scoped by marker: all three rows, in ascending id order
        let all = list_products(&db, Pagination { page: 1, limit: 10 }, &marker).await?;
        assert_eq!(all.data.len(), 3);
        assert!(all.data.windows(2).all(|w| w[0].id < w[1].id));
        assert_eq!(all.message, "Page 1 with 10 products");

        // Filtered pagination: "<marker> Red" matches the 1st and 3rd rows;
        // page 1 takes the shoe, page 2 skips one match and takes the hat
        let red_search = format!("{} Red", marker);
        let page1 = list_products(&db, Pagination { page: 1, limit: 1 }, &red_search).await?;
        assert_eq!(page1.data.len(), 1);
        assert_eq!(page1.data[0].id, ids[0]);
        let page2 = list_products(&db, Pagination { page: 2, limit: 1 }, &red_search).await?;
        assert_eq!(page2.data.len(), 1);
        assert_eq!(page2.data[0].id, ids[2]);

        // Views carry the category name and image fallback
        assert_eq!(all.data[0].category, cat.name);
        assert_eq!(all.data[0].image_url, "/static/images/products/default.jpg");
        assert_eq!(all.data[0].rating, 0.0);

        // Empty result set yields an empty data array
        let none = list_products(&db, Pagination::default(), &format!("no-such-{}", marker)).await?;
        assert!(none.data.is_empty());

        for id in ids { models::product::Entity::delete_by_id(id).exec(&db).await?; }
        models::category::Entity::delete_by_id(cat.id).exec(&db).await?;
        Ok(())
    }
}
