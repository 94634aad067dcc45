use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use models::category;

use crate::errors::ServiceError;
use crate::pagination::Pagination;
use crate::responses::{self, Envelope};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCreate {
    pub name: String,
}

/// Full-replacement update payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryUpdate {
    pub name: String,
}

/// List categories whose name contains `search`, ordered by ascending id.
pub async fn list_categories(
    db: &DatabaseConnection,
    opts: Pagination,
    search: &str,
) -> Result<Envelope<Vec<category::Model>>, ServiceError> {
    let norm = opts.normalized();
    let (offset, limit) = norm.to_offset_limit();
    let rows = category::Entity::find()
        .filter(category::Column::Name.contains(search))
        .order_by_asc(category::Column::Id)
        .offset(offset)
        .limit(limit)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(responses::page_success("categories", norm.page, norm.limit, rows))
}

pub async fn get_category(db: &DatabaseConnection, id: i32) -> Result<Envelope<category::Model>, ServiceError> {
    let found = category::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("Category", id))?;
    let name = found.name.clone();
    Ok(responses::get_single_success(&name, id, found))
}

pub async fn create_category(
    db: &DatabaseConnection,
    payload: CategoryCreate,
) -> Result<Envelope<category::Model>, ServiceError> {
    let created = category::create(db, &payload.name).await?;
    info!(id = created.id, name = %created.name, "category_created");
    let name = created.name.clone();
    Ok(responses::create_success(&name, created.id, created))
}

pub async fn update_category(
    db: &DatabaseConnection,
    id: i32,
    payload: CategoryUpdate,
) -> Result<Envelope<category::Model>, ServiceError> {
    category::validate_name(&payload.name)?;
    let mut am: category::ActiveModel = category::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("Category", id))?
        .into();
    am.name = Set(payload.name);
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    info!(id = updated.id, name = %updated.name, "category_updated");
    let name = updated.name.clone();
    Ok(responses::update_success(&name, updated.id, updated))
}

/// Delete a category. Products referencing it fall back to "Uncategorized"
/// (the FK nullifies the reference).
pub async fn delete_category(db: &DatabaseConnection, id: i32) -> Result<Envelope<category::Model>, ServiceError> {
    let found = category::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("Category", id))?;
    category::Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    info!(id, name = %found.name, "category_deleted");
    let name = found.name.clone();
    Ok(responses::delete_success(&name, id, found))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use uuid::Uuid;

    #[tokio::test]
    async fn category_crud_service() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;

        let name = format!("svc_category_{}", Uuid::new_v4());
        let created = create_category(&db, CategoryCreate { name: name.clone() }).await?;
        assert_eq!(created.data.name, name);

        let fetched = get_category(&db, created.data.id).await?;
        assert_eq!(fetched.data.id, created.data.id);

        let renamed = format!("renamed_{}", Uuid::new_v4());
        let updated = update_category(&db, created.data.id, CategoryUpdate { name: renamed.clone() }).await?;
        assert_eq!(updated.data.name, renamed);

        let listed = list_categories(&db, Pagination { page: 1, limit: 10 }, &renamed).await?;
        assert_eq!(listed.data.len(), 1);
        assert_eq!(listed.message, "Page 1 with 10 categories");

        let deleted = delete_category(&db, created.data.id).await?;
        assert_eq!(deleted.data.id, created.data.id);
        let gone = get_category(&db, created.data.id).await;
        assert!(matches!(gone, Err(ServiceError::NotFound(_))));

        // Empty names are rejected
        let bad = create_category(&db, CategoryCreate { name: "  ".into() }).await;
        assert!(bad.is_err());
        Ok(())
    }
}
