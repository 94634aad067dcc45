use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;

pub const ROLE_USER: &str = "user";
pub const ROLE_ADMIN: &str = "admin";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Cart,
    Credentials,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Cart => Entity::has_many(crate::cart::Entity).into(),
            Relation::Credentials => Entity::has_one(crate::user_credentials::Entity).into(),
        }
    }
}

impl Related<crate::cart::Entity> for Entity {
    fn to() -> RelationDef { Relation::Cart.def() }
}

impl Related<crate::user_credentials::Entity> for Entity {
    fn to() -> RelationDef { Relation::Credentials.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_username(username: &str) -> Result<(), errors::ModelError> {
    if username.trim().is_empty() {
        return Err(errors::ModelError::Validation("username required".into()));
    }
    if username.contains(char::is_whitespace) {
        return Err(errors::ModelError::Validation("username must not contain whitespace".into()));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), errors::ModelError> {
    if !email.contains('@') {
        return Err(errors::ModelError::Validation("invalid email".into()));
    }
    Ok(())
}

pub fn validate_full_name(name: &str) -> Result<(), errors::ModelError> {
    if name.trim().is_empty() {
        return Err(errors::ModelError::Validation("full name required".into()));
    }
    Ok(())
}

pub fn validate_role(role: &str) -> Result<(), errors::ModelError> {
    if role != ROLE_USER && role != ROLE_ADMIN {
        return Err(errors::ModelError::Validation("role must be 'user' or 'admin'".into()));
    }
    Ok(())
}

pub async fn create(
    db: &DatabaseConnection,
    username: &str,
    email: &str,
    full_name: &str,
    role: &str,
) -> Result<Model, errors::ModelError> {
    validate_username(username)?;
    validate_email(email)?;
    validate_full_name(full_name)?;
    validate_role(role)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        username: Set(username.to_string()),
        email: Set(email.to_string()),
        full_name: Set(full_name.to_string()),
        role: Set(role.to_string()),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn find_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::Email.eq(email))
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_needs_at_sign() {
        assert!(validate_email("nope").is_err());
        assert!(validate_email("a@b.com").is_ok());
    }

    #[test]
    fn username_rejects_whitespace() {
        assert!(validate_username("bad name").is_err());
        assert!(validate_username("").is_err());
        assert!(validate_username("fine").is_ok());
    }

    #[test]
    fn role_is_closed_set() {
        assert!(validate_role(ROLE_USER).is_ok());
        assert!(validate_role(ROLE_ADMIN).is_ok());
        assert!(validate_role("root").is_err());
    }
}
