use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use models::{user, user_credentials};

use crate::auth::service::hash_password;
use crate::errors::ServiceError;
use crate::pagination::Pagination;
use crate::responses::{self, Envelope};

fn default_role() -> String { user::ROLE_USER.to_string() }

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password: String,
    #[serde(default = "default_role")]
    pub role: String,
}

/// Full-replacement update payload; password changes go through accounts/auth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserUpdate {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub is_active: bool,
}

/// List users whose username contains `search`, ordered by ascending id.
pub async fn list_users(
    db: &DatabaseConnection,
    opts: Pagination,
    search: &str,
) -> Result<Envelope<Vec<user::Model>>, ServiceError> {
    let norm = opts.normalized();
    let (offset, limit) = norm.to_offset_limit();
    let rows = user::Entity::find()
        .filter(user::Column::Username.contains(search))
        .order_by_asc(user::Column::Id)
        .offset(offset)
        .limit(limit)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(responses::page_success("users", norm.page, norm.limit, rows))
}

pub async fn get_user(db: &DatabaseConnection, id: i32) -> Result<Envelope<user::Model>, ServiceError> {
    let found = user::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("User", id))?;
    let username = found.username.clone();
    Ok(responses::get_single_success(&username, id, found))
}

/// Create a user with hashed credentials.
pub async fn create_user(
    db: &DatabaseConnection,
    payload: UserCreate,
) -> Result<Envelope<user::Model>, ServiceError> {
    if payload.password.len() < 8 {
        return Err(ServiceError::Validation("password too short (>=8)".into()));
    }
    if user::find_by_email(db, &payload.email).await?.is_some() {
        return Err(ServiceError::Validation("email already registered".into()));
    }
    let created = user::create(db, &payload.username, &payload.email, &payload.full_name, &payload.role).await?;
    let hash = hash_password(&payload.password).map_err(|e| ServiceError::Internal(e.to_string()))?;
    user_credentials::upsert_password(db, created.id, hash, "argon2").await?;
    info!(id = created.id, username = %created.username, "user_created");
    let username = created.username.clone();
    Ok(responses::create_success(&username, created.id, created))
}

/// Overwrite every mutable profile field of a user.
pub async fn update_user(
    db: &DatabaseConnection,
    id: i32,
    payload: UserUpdate,
) -> Result<Envelope<user::Model>, ServiceError> {
    user::validate_username(&payload.username)?;
    user::validate_email(&payload.email)?;
    user::validate_full_name(&payload.full_name)?;
    user::validate_role(&payload.role)?;

    let mut am: user::ActiveModel = user::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("User", id))?
        .into();
    am.username = Set(payload.username);
    am.email = Set(payload.email);
    am.full_name = Set(payload.full_name);
    am.role = Set(payload.role);
    am.is_active = Set(payload.is_active);
    am.updated_at = Set(chrono::Utc::now().into());
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    info!(id = updated.id, username = %updated.username, "user_updated");
    let username = updated.username.clone();
    Ok(responses::update_success(&username, updated.id, updated))
}

/// Delete a user; credentials and carts cascade.
pub async fn delete_user(db: &DatabaseConnection, id: i32) -> Result<Envelope<user::Model>, ServiceError> {
    let found = user::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("User", id))?;
    user::Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    info!(id, username = %found.username, "user_deleted");
    let username = found.username.clone();
    Ok(responses::delete_success(&username, id, found))
}
