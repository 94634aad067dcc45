use std::sync::Arc;

use argon2::{Argon2, password_hash::{PasswordHasher, PasswordVerifier, SaltString}, PasswordHash};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use tracing::{info, debug, instrument};

use super::domain::{SignupInput, LoginInput, AuthUser, AuthSession};
use super::errors::AuthError;
use super::repository::AuthRepository;

pub const ACCESS_TOKEN_TTL_MINUTES: i64 = 30;
pub const REFRESH_TOKEN_TTL_DAYS: i64 = 7;
pub const TOKEN_KIND_ACCESS: &str = "access";
pub const TOKEN_KIND_REFRESH: &str = "refresh";

/// JWT claims carried by both token kinds; `kind` tells them apart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub uid: i32,
    pub role: String,
    pub kind: String,
    pub exp: usize,
}

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: Option<String>,
    pub password_algorithm: String,
}

/// Hash a password with a fresh salt.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AuthError::HashError(e.to_string()))
}

/// Decode and validate a token (signature + expiry) against the secret.
pub fn decode_token(secret: &str, token: &str) -> Result<Claims, AuthError> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| AuthError::TokenError(e.to_string()))
}

fn issue_token(secret: &str, user: &AuthUser, kind: &str, exp: chrono::DateTime<chrono::Utc>) -> Result<String, AuthError> {
    let claims = Claims {
        sub: user.email.clone(),
        uid: user.id,
        role: user.role.clone(),
        kind: kind.to_string(),
        exp: exp.timestamp() as usize,
    };
    encode(&JwtHeader::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| AuthError::TokenError(e.to_string()))
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    cfg: AuthConfig,
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self { Self { repo, cfg } }

    /// Register a new user with a hashed password.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::SignupInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo, AuthConfig { jwt_secret: None, password_algorithm: "argon2".into() });
    /// let input = SignupInput { username: "tester".into(), email: "user@example.com".into(), full_name: "Test".into(), password: "Secret123".into() };
    /// let user = tokio_test::block_on(svc.signup(input)).unwrap();
    /// assert_eq!(user.email, "user@example.com");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email, username = %input.username))]
    pub async fn signup(&self, input: SignupInput) -> Result<AuthUser, AuthError> {
        if input.password.len() < 8 {
            return Err(AuthError::Validation("password too short (>=8)".into()));
        }
        if let Some(existing) = self.repo.find_user_by_email(&input.email).await? {
            debug!("user exists: {}", existing.email);
            return Err(AuthError::Conflict);
        }
        if self.repo.find_user_by_username(&input.username).await?.is_some() {
            return Err(AuthError::Conflict);
        }

        let user = self.repo.create_user(&input.username, &input.email, &input.full_name).await?;
        let hash = hash_password(&input.password)?;

        let _cred = self.repo.upsert_password(user.id, hash, self.cfg.password_algorithm.clone()).await?;
        info!(user_id = user.id, email = %user.email, "user_signed_up");
        Ok(user)
    }

    /// Authenticate a user and issue an access/refresh token pair.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::{SignupInput, LoginInput};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo.clone(), AuthConfig { jwt_secret: Some("secret".into()), password_algorithm: "argon2".into() });
    /// let _ = tokio_test::block_on(svc.signup(SignupInput { username: "n".into(), email: "u@e.com".into(), full_name: "N".into(), password: "Passw0rd".into() }));
    /// let session = tokio_test::block_on(svc.login(LoginInput { email: "u@e.com".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(session.user.email, "u@e.com");
    /// assert!(session.access_token.is_some());
    /// assert!(session.refresh_token.is_some());
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let user = self.repo
            .find_user_by_email(&input.email)
            .await?
            .ok_or(AuthError::Unauthorized)?;
        if !user.is_active {
            return Err(AuthError::Unauthorized);
        }

        let cred = self.repo
            .get_credentials(user.id)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let parsed = PasswordHash::new(&cred.password_hash).map_err(|e| AuthError::HashError(e.to_string()))?;
        if Argon2::default().verify_password(input.password.as_bytes(), &parsed).is_err() {
            return Err(AuthError::Unauthorized);
        }

        let (access_token, refresh_token) = self.issue_pair(&user)?;
        info!(user_id = user.id, "user_logged_in");
        Ok(AuthSession { user, access_token, refresh_token })
    }

    /// Exchange a refresh token for a fresh token pair. Access tokens are
    /// rejected here; only `kind == "refresh"` passes.
    #[instrument(skip(self, refresh_token))]
    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthSession, AuthError> {
        let secret = self.cfg.jwt_secret.as_deref()
            .ok_or_else(|| AuthError::TokenError("no signing secret configured".into()))?;
        let claims = decode_token(secret, refresh_token)?;
        if claims.kind != TOKEN_KIND_REFRESH {
            return Err(AuthError::Unauthorized);
        }
        let user = self.repo
            .find_user_by_id(claims.uid)
            .await?
            .ok_or(AuthError::Unauthorized)?;
        if !user.is_active {
            return Err(AuthError::Unauthorized);
        }
        let (access_token, refresh_token) = self.issue_pair(&user)?;
        info!(user_id = user.id, "token_refreshed");
        Ok(AuthSession { user, access_token, refresh_token })
    }

    fn issue_pair(&self, user: &AuthUser) -> Result<(Option<String>, Option<String>), AuthError> {
        match self.cfg.jwt_secret.as_deref() {
            Some(secret) => {
                let now = chrono::Utc::now();
                let access = issue_token(
                    secret,
                    user,
                    TOKEN_KIND_ACCESS,
                    now + chrono::Duration::minutes(ACCESS_TOKEN_TTL_MINUTES),
                )?;
                let refresh = issue_token(
                    secret,
                    user,
                    TOKEN_KIND_REFRESH,
                    now + chrono::Duration::days(REFRESH_TOKEN_TTL_DAYS),
                )?;
                Ok((Some(access), Some(refresh)))
            }
            None => Ok((None, None)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::domain::{LoginInput, SignupInput};
    use crate::auth::repository::mock::MockAuthRepository;

    fn svc(secret: Option<&str>) -> AuthService<MockAuthRepository> {
        AuthService::new(
            Arc::new(MockAuthRepository::default()),
            AuthConfig { jwt_secret: secret.map(|s| s.to_string()), password_algorithm: "argon2".into() },
        )
    }

    fn signup_input(email: &str) -> SignupInput {
        SignupInput {
            username: email.split('@').next().unwrap().to_string(),
            email: email.to_string(),
            full_name: "Tester".into(),
            password: "Passw0rd".into(),
        }
    }

    #[tokio::test]
    async fn signup_then_login_round_trip() {
        let svc = svc(Some("test-secret"));
        let user = svc.signup(signup_input("a@example.com")).await.unwrap();
        assert_eq!(user.role, "user");

        let session = svc.login(LoginInput { email: "a@example.com".into(), password: "Passw0rd".into() }).await.unwrap();
        assert!(session.access_token.is_some());
        assert!(session.refresh_token.is_some());

        let claims = decode_token("test-secret", session.access_token.as_deref().unwrap()).unwrap();
        assert_eq!(claims.uid, user.id);
        assert_eq!(claims.kind, TOKEN_KIND_ACCESS);
    }

    #[tokio::test]
    async fn duplicate_signup_conflicts() {
        let svc = svc(None);
        svc.signup(signup_input("dup@example.com")).await.unwrap();
        let again = svc.signup(signup_input("dup@example.com")).await;
        assert!(matches!(again, Err(AuthError::Conflict)));
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let svc = svc(Some("s"));
        svc.signup(signup_input("b@example.com")).await.unwrap();
        let res = svc.login(LoginInput { email: "b@example.com".into(), password: "WrongPass1".into() }).await;
        assert!(matches!(res, Err(AuthError::Unauthorized)));
    }

    #[tokio::test]
    async fn short_password_rejected() {
        let svc = svc(None);
        let mut input = signup_input("c@example.com");
        input.password = "short".into();
        assert!(matches!(svc.signup(input).await, Err(AuthError::Validation(_))));
    }

    #[tokio::test]
    async fn refresh_rejects_access_tokens() {
        let svc = svc(Some("test-secret"));
        svc.signup(signup_input("d@example.com")).await.unwrap();
        let session = svc.login(LoginInput { email: "d@example.com".into(), password: "Passw0rd".into() }).await.unwrap();

        // Access token is not a refresh token
        let res = svc.refresh(session.access_token.as_deref().unwrap()).await;
        assert!(matches!(res, Err(AuthError::Unauthorized)));

        // The real refresh token issues a new pair
        let renewed = svc.refresh(session.refresh_token.as_deref().unwrap()).await.unwrap();
        assert!(renewed.access_token.is_some());
        assert_eq!(renewed.user.email, "d@example.com");
    }
}
