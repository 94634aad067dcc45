use serde::{Deserialize, Serialize};

/// Signup input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupInput {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password: String,
}

/// Login input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Domain user (business view)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub is_active: bool,
}

/// Domain credentials (hashed)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub user_id: i32,
    pub password_hash: String,
    pub password_algorithm: String,
}

/// Login result (session): a short-lived access token plus a refresh token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub user: AuthUser,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}
