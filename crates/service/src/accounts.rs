use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use serde::{Deserialize, Serialize};
use tracing::info;

use models::{user, user_credentials};

use crate::auth::service::hash_password;
use crate::errors::ServiceError;
use crate::responses::{self, Envelope};

/// Update payload for the caller's own account. Email and full name are
/// replaced; the password changes only when provided.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountUpdate {
    pub email: String,
    pub full_name: String,
    #[serde(default)]
    pub password: Option<String>,
}

pub async fn get_my_account(db: &DatabaseConnection, user_id: i32) -> Result<Envelope<user::Model>, ServiceError> {
    let found = user::Entity::find_by_id(user_id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("User", user_id))?;
    let username = found.username.clone();
    Ok(responses::get_single_success(&username, user_id, found))
}

pub async fn update_my_account(
    db: &DatabaseConnection,
    user_id: i32,
    payload: AccountUpdate,
) -> Result<Envelope<user::Model>, ServiceError> {
    user::validate_email(&payload.email)?;
    user::validate_full_name(&payload.full_name)?;
    if let Some(password) = &payload.password {
        if password.len() < 8 {
            return Err(ServiceError::Validation("password too short (>=8)".into()));
        }
    }

    let mut am: user::ActiveModel = user::Entity::find_by_id(user_id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("User", user_id))?
        .into();
    am.email = Set(payload.email);
    am.full_name = Set(payload.full_name);
    am.updated_at = Set(chrono::Utc::now().into());
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;

    if let Some(password) = payload.password {
        let hash = hash_password(&password).map_err(|e| ServiceError::Internal(e.to_string()))?;
        user_credentials::upsert_password(db, user_id, hash, "argon2").await?;
        info!(id = user_id, "account_password_changed");
    }

    info!(id = updated.id, username = %updated.username, "account_updated");
    let username = updated.username.clone();
    Ok(responses::update_success(&username, updated.id, updated))
}

pub async fn delete_my_account(db: &DatabaseConnection, user_id: i32) -> Result<Envelope<user::Model>, ServiceError> {
    let found = user::Entity::find_by_id(user_id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("User", user_id))?;
    user::Entity::delete_by_id(user_id)
        .exec(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    info!(id = user_id, username = %found.username, "account_deleted");
    let username = found.username.clone();
    Ok(responses::delete_success(&username, user_id, found))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use uuid::Uuid;

    #[tokio::test]
    async fn account_self_service() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;

        let username = format!("acct_{}", Uuid::new_v4().simple());
        let email = format!("acct_{}@example.com", Uuid::new_v4());
        let me = user::create(&db, &username, &email, "Account User", user::ROLE_USER).await?;

        let fetched = get_my_account(&db, me.id).await?;
        assert_eq!(fetched.data.username, username);

        let new_email = format!("new_{}@example.com", Uuid::new_v4());
        let updated = update_my_account(&db, me.id, AccountUpdate {
            email: new_email.clone(),
            full_name: "Renamed".into(),
            password: Some("NewPassword1".into()),
        }).await?;
        assert_eq!(updated.data.email, new_email);
        assert!(user_credentials::find_by_user(&db, me.id).await?.is_some());

        let deleted = delete_my_account(&db, me.id).await?;
        assert_eq!(deleted.data.id, me.id);
        let gone = get_my_account(&db, me.id).await;
        assert!(matches!(gone, Err(ServiceError::NotFound(_))));
        Ok(())
    }
}
