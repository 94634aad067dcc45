use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use models::{cart, cart_item, product};

use crate::errors::ServiceError;
use crate::pagination::Pagination;
use crate::responses::{self, Envelope};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItemInput {
    pub product_id: i32,
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartCreate {
    pub items: Vec<CartItemInput>,
}

/// Full-replacement update payload: the item set is replaced wholesale and
/// totals are recomputed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartUpdate {
    pub items: Vec<CartItemInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItemView {
    pub product_id: i32,
    pub title: String,
    pub price: i64,
    pub quantity: i32,
    pub subtotal: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartView {
    pub id: i32,
    pub user_id: i32,
    pub total_amount: i64,
    pub created_at: sea_orm::prelude::DateTimeWithTimeZone,
    pub items: Vec<CartItemView>,
}

/// Price an item set against live products. Any missing product aborts the
/// whole operation before a row is written.
async fn resolve_items(
    db: &DatabaseConnection,
    items: &[CartItemInput],
) -> Result<Vec<(product::Model, i32, i64)>, ServiceError> {
    if items.is_empty() {
        return Err(ServiceError::Validation("cart needs at least one item".into()));
    }
    let mut resolved = Vec::with_capacity(items.len());
    for item in items {
        cart_item::validate_quantity(item.quantity)?;
        let p = product::Entity::find_by_id(item.product_id)
            .one(db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?
            .ok_or_else(|| ServiceError::not_found("Product", item.product_id))?;
        let subtotal = p.price * item.quantity as i64;
        resolved.push((p, item.quantity, subtotal));
    }
    Ok(resolved)
}

/// Find a cart scoped to its owner; someone else's cart reads as missing.
async fn find_owned(
    db: &DatabaseConnection,
    user_id: i32,
    cart_id: i32,
) -> Result<cart::Model, ServiceError> {
    cart::Entity::find_by_id(cart_id)
        .filter(cart::Column::UserId.eq(user_id))
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("Cart", cart_id))
}

async fn item_views(db: &DatabaseConnection, cart_ids: Vec<i32>) -> Result<HashMap<i32, Vec<CartItemView>>, ServiceError> {
    let rows = cart_item::Entity::find()
        .filter(cart_item::Column::CartId.is_in(cart_ids))
        .find_also_related(product::Entity)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    let mut by_cart: HashMap<i32, Vec<CartItemView>> = HashMap::new();
    for (item, prod) in rows {
        by_cart.entry(item.cart_id).or_default().push(CartItemView {
            product_id: item.product_id,
            title: prod.as_ref().map(|p| p.title.clone()).unwrap_or_default(),
            price: prod.map(|p| p.price).unwrap_or(0),
            quantity: item.quantity,
            subtotal: item.subtotal,
        });
    }
    Ok(by_cart)
}

fn view(row: cart::Model, items: Vec<CartItemView>) -> CartView {
    CartView {
        id: row.id,
        user_id: row.user_id,
        total_amount: row.total_amount,
        created_at: row.created_at,
        items,
    }
}

/// List the caller's carts, ordered by ascending id.
pub async fn list_carts(
    db: &DatabaseConnection,
    user_id: i32,
    opts: Pagination,
) -> Result<Envelope<Vec<CartView>>, ServiceError> {
    let norm = opts.normalized();
    let (offset, limit) = norm.to_offset_limit();
    let rows = cart::Entity::find()
        .filter(cart::Column::UserId.eq(user_id))
        .order_by_asc(cart::Column::Id)
        .offset(offset)
        .limit(limit)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    let mut by_cart = item_views(db, rows.iter().map(|c| c.id).collect()).await?;
    let views = rows
        .into_iter()
        .map(|c| { let items = by_cart.remove(&c.id).unwrap_or_default(); view(c, items) })
        .collect();
    Ok(responses::page_success("carts", norm.page, norm.limit, views))
}

pub async fn get_cart(db: &DatabaseConnection, user_id: i32, cart_id: i32) -> Result<Envelope<CartView>, ServiceError> {
    let row = find_owned(db, user_id, cart_id).await?;
    let mut by_cart = item_views(db, vec![row.id]).await?;
    let items = by_cart.remove(&row.id).unwrap_or_default();
    Ok(responses::get_single_success("Cart", cart_id, view(row, items)))
}

/// Create a cart from an item set; subtotals and the total come from live
/// product prices, written atomically.
pub async fn create_cart(
    db: &DatabaseConnection,
    user_id: i32,
    payload: CartCreate,
) -> Result<Envelope<CartView>, ServiceError> {
    let resolved = resolve_items(db, &payload.items).await?;
    let total: i64 = resolved.iter().map(|(_, _, s)| *s).sum();

    let txn = db.begin().await.map_err(|e| ServiceError::Db(e.to_string()))?;
    let row = cart::ActiveModel {
        user_id: Set(user_id),
        total_amount: Set(total),
        created_at: Set(chrono::Utc::now().into()),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(|e| ServiceError::Db(e.to_string()))?;

    let mut items = Vec::with_capacity(resolved.len());
    for (p, quantity, subtotal) in resolved {
        cart_item::ActiveModel {
            cart_id: Set(row.id),
            product_id: Set(p.id),
            quantity: Set(quantity),
            subtotal: Set(subtotal),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
        items.push(CartItemView { product_id: p.id, title: p.title, price: p.price, quantity, subtotal });
    }
    txn.commit().await.map_err(|e| ServiceError::Db(e.to_string()))?;

    info!(id = row.id, user_id, total, "cart_created");
    let id = row.id;
    Ok(responses::create_success("Cart", id, view(row, items)))
}

/// Replace a cart's item set and recompute totals in one transaction.
pub async fn update_cart(
    db: &DatabaseConnection,
    user_id: i32,
    cart_id: i32,
    payload: CartUpdate,
) -> Result<Envelope<CartView>, ServiceError> {
    let row = find_owned(db, user_id, cart_id).await?;
    let resolved = resolve_items(db, &payload.items).await?;
    let total: i64 = resolved.iter().map(|(_, _, s)| *s).sum();

    let txn = db.begin().await.map_err(|e| ServiceError::Db(e.to_string()))?;
    cart_item::Entity::delete_many()
        .filter(cart_item::Column::CartId.eq(cart_id))
        .exec(&txn)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;

    let mut items = Vec::with_capacity(resolved.len());
    for (p, quantity, subtotal) in &resolved {
        cart_item::ActiveModel {
            cart_id: Set(cart_id),
            product_id: Set(p.id),
            quantity: Set(*quantity),
            subtotal: Set(*subtotal),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
        items.push(CartItemView {
            product_id: p.id,
            title: p.title.clone(),
            price: p.price,
            quantity: *quantity,
            subtotal: *subtotal,
        });
    }

    let mut am: cart::ActiveModel = row.into();
    am.total_amount = Set(total);
    let updated = am.update(&txn).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    txn.commit().await.map_err(|e| ServiceError::Db(e.to_string()))?;

    info!(id = cart_id, user_id, total, "cart_updated");
    Ok(responses::update_success("Cart", cart_id, view(updated, items)))
}

/// Delete a cart; its items cascade away with it.
pub async fn delete_cart(db: &DatabaseConnection, user_id: i32, cart_id: i32) -> Result<Envelope<cart::Model>, ServiceError> {
    let row = find_owned(db, user_id, cart_id).await?;
    cart::Entity::delete_by_id(cart_id)
        .exec(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    info!(id = cart_id, user_id, "cart_deleted");
    Ok(responses::delete_success("Cart", cart_id, row))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use models::user;
    use uuid::Uuid;

    async fn fixture_product(db: &DatabaseConnection, price: i64) -> Result<product::Model, anyhow::Error> {
        let p = product::create(db, product::NewProduct {
            title: format!("Cart Fixture {}", Uuid::new_v4()),
            price,
            old_price: None,
            description: "fixture".into(),
            image: None,
            rating: None,
            category_id: None,
        }).await?;
        Ok(p)
    }

    #[tokio::test]
    async fn cart_crud_service() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;

        let owner = user::create(
            &db,
            &format!("cart_svc_{}", Uuid::new_v4().simple()),
            &format!("cart_svc_{}@example.com", Uuid::new_v4()),
            "Cart Owner",
            user::ROLE_USER,
        ).await?;
        let p1 = fixture_product(&db, 1000).await?;
        let p2 = fixture_product(&db, 250).await?;

        // Create: total is the sum of price*quantity over items
        let created = create_cart(&db, owner.id, CartCreate {
            items: vec![
                CartItemInput { product_id: p1.id, quantity: 2 },
                CartItemInput { product_id: p2.id, quantity: 4 },
            ],
        }).await?;
        assert_eq!(created.data.total_amount, 2 * 1000 + 4 * 250);
        assert_eq!(created.data.items.len(), 2);

        // Get is owner-scoped: a stranger sees Not-Found
        let fetched = get_cart(&db, owner.id, created.data.id).await?;
        assert_eq!(fetched.data.total_amount, created.data.total_amount);
        let stranger = get_cart(&db, owner.id + 1, created.data.id).await;
        assert!(matches!(stranger, Err(ServiceError::NotFound(_))));

        // A missing product aborts creation entirely
        let before = list_carts(&db, owner.id, Pagination::default()).await?.data.len();
        let bad = create_cart(&db, owner.id, CartCreate {
            items: vec![CartItemInput { product_id: i32::MAX, quantity: 1 }],
        }).await;
        match bad {
            Err(ServiceError::NotFound(msg)) => assert!(msg.contains("Product")),
            other => panic!("expected NotFound, got {:?}", other.map(|e| e.message)),
        }
        let after = list_carts(&db, owner.id, Pagination::default()).await?.data.len();
        assert_eq!(before, after);

        // Update replaces the item set and recomputes the total
        let updated = update_cart(&db, owner.id, created.data.id, CartUpdate {
            items: vec![CartItemInput { product_id: p2.id, quantity: 1 }],
        }).await?;
        assert_eq!(updated.data.total_amount, 250);
        assert_eq!(updated.data.items.len(), 1);

        // Zero quantity is rejected
        let zero = update_cart(&db, owner.id, created.data.id, CartUpdate {
            items: vec![CartItemInput { product_id: p2.id, quantity: 0 }],
        }).await;
        assert!(zero.is_err());

        // Delete, then get misses
        delete_cart(&db, owner.id, created.data.id).await?;
        let gone = get_cart(&db, owner.id, created.data.id).await;
        assert!(matches!(gone, Err(ServiceError::NotFound(_))));

        product::Entity::delete_by_id(p1.id).exec(&db).await?;
        product::Entity::delete_by_id(p2.id).exec(&db).await?;
        user::Entity::delete_by_id(owner.id).exec(&db).await?;
        Ok(())
    }
}
