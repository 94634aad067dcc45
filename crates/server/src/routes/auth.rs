use std::sync::Arc;

use axum::{Json, extract::{Request, State}, http::StatusCode, middleware::Next, response::Response};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use tracing::warn;

use service::auth::domain::{LoginInput, SignupInput};
use service::auth::errors::AuthError;
use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::service::{decode_token, AuthConfig, AuthService, TOKEN_KIND_ACCESS};

use crate::errors::ApiError;

#[derive(Clone)]
pub struct ServerAuthConfig {
    pub jwt_secret: String,
}

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: ServerAuthConfig,
}

/// Verified token claims, inserted into request extensions by the bearer
/// middleware for protected routes.
#[derive(Clone, Debug)]
pub struct AuthContext {
    pub user_id: i32,
    pub email: String,
    pub role: String,
}

#[derive(Serialize)]
pub struct SignupOutput {
    pub user_id: i32,
}

#[derive(Serialize)]
pub struct TokenOutput {
    pub user_id: i32,
    pub username: String,
    pub email: String,
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshInput {
    pub refresh_token: String,
}

fn auth_service(state: &ServerState) -> AuthService<SeaOrmAuthRepository> {
    let repo = Arc::new(SeaOrmAuthRepository { db: state.db.clone() });
    AuthService::new(repo, AuthConfig {
        jwt_secret: Some(state.auth.jwt_secret.clone()),
        password_algorithm: "argon2".into(),
    })
}

fn map_auth_err(e: AuthError) -> (StatusCode, String) {
    let status = match e {
        AuthError::Validation(_) => StatusCode::BAD_REQUEST,
        AuthError::Conflict => StatusCode::CONFLICT,
        AuthError::Unauthorized | AuthError::NotFound | AuthError::TokenError(_) => StatusCode::UNAUTHORIZED,
        AuthError::HashError(_) | AuthError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, e.to_string())
}

fn token_output(session: service::auth::domain::AuthSession) -> Result<TokenOutput, (StatusCode, String)> {
    let user = session.user;
    match (session.access_token, session.refresh_token) {
        (Some(access_token), Some(refresh_token)) => Ok(TokenOutput {
            user_id: user.id,
            username: user.username,
            email: user.email,
            access_token,
            refresh_token,
            token_type: "bearer".into(),
        }),
        _ => Err((StatusCode::INTERNAL_SERVER_ERROR, "token generation failed".into())),
    }
}

#[utoipa::path(post, path = "/auth/signup", tag = "auth", request_body = crate::openapi::SignupRequest, responses((status = 200, description = "Registered"), (status = 400, description = "Bad Request"), (status = 409, description = "Conflict")))]
pub async fn signup(State(state): State<ServerState>, Json(input): Json<SignupInput>) -> Result<Json<SignupOutput>, (StatusCode, String)> {
    let svc = auth_service(&state);
    let user = svc.signup(input).await.map_err(map_auth_err)?;
    Ok(Json(SignupOutput { user_id: user.id }))
}

#[utoipa::path(post, path = "/auth/login", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged In"), (status = 401, description = "Unauthorized")))]
pub async fn login(State(state): State<ServerState>, jar: CookieJar, Json(input): Json<LoginInput>) -> Result<(CookieJar, Json<TokenOutput>), (StatusCode, String)> {
    let svc = auth_service(&state);
    let session = svc.login(input).await.map_err(map_auth_err)?;
    let out = token_output(session)?;

    // Browser clients get the access token as a cookie as well
    let mut cookie = Cookie::new("auth_token", out.access_token.clone());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(false);
    cookie.set_same_site(axum_extra::extract::cookie::SameSite::Lax);
    let jar = jar.add(cookie);
    Ok((jar, Json(out)))
}

#[utoipa::path(post, path = "/auth/refresh", tag = "auth", request_body = crate::openapi::RefreshRequest, responses((status = 200, description = "Refreshed"), (status = 401, description = "Unauthorized")))]
pub async fn refresh(State(state): State<ServerState>, Json(input): Json<RefreshInput>) -> Result<Json<TokenOutput>, (StatusCode, String)> {
    let svc = auth_service(&state);
    let session = svc.refresh(&input.refresh_token).await.map_err(map_auth_err)?;
    Ok(Json(token_output(session)?))
}

#[utoipa::path(post, path = "/auth/logout", tag = "auth", responses((status = 204, description = "Logged Out")))]
pub async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    let jar = jar.remove(Cookie::from("auth_token"));
    (jar, StatusCode::NO_CONTENT)
}

/// Only admins pass; everyone else gets 403.
pub fn require_admin(ctx: &AuthContext) -> Result<(), ApiError> {
    if ctx.role != models::user::ROLE_ADMIN {
        return Err(ApiError::new(StatusCode::FORBIDDEN, "Forbidden", Some("admin role required".into())));
    }
    Ok(())
}

fn is_public(path: &str, method: &axum::http::Method) -> bool {
    if path == "/health"
        || path.starts_with("/auth/")
        || path.starts_with("/static")
        || path.starts_with("/docs")
        || path.starts_with("/api-docs")
        || method == axum::http::Method::OPTIONS
    {
        return true;
    }
    // Product and category browsing is open; mutations are not
    if method == axum::http::Method::GET
        && (path.starts_with("/products") || path.starts_with("/categories"))
    {
        return true;
    }
    false
}

/// Global middleware: outside the public whitelist, require a valid
/// access token via `Authorization: Bearer <token>` or the `auth_token`
/// cookie. Missing token is 400, invalid or expired is 401.
pub async fn require_bearer_token_state(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let path = req.uri().path().to_string();
    let method = req.method().clone();

    if is_public(&path, &method) {
        return Ok(next.run(req).await);
    }

    // Authorization header first; fall back to the auth_token cookie
    let token = {
        let authz = req
            .headers()
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        if let Some(h) = authz {
            let prefix = "Bearer ";
            if !h.starts_with(prefix) {
                warn!(path = %path, "invalid Authorization format (expect Bearer)");
                return Err(StatusCode::UNAUTHORIZED);
            }
            h[prefix.len()..].to_string()
        } else {
            let cookie_header = req
                .headers()
                .get(axum::http::header::COOKIE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("");

            let mut token_val: Option<String> = None;
            for part in cookie_header.split(';') {
                let kv = part.trim();
                if let Some(rest) = kv.strip_prefix("auth_token=") {
                    token_val = Some(rest.to_string());
                    break;
                }
            }

            match token_val {
                Some(t) if !t.is_empty() => t,
                _ => {
                    warn!(path = %path, "missing Authorization header and auth_token cookie");
                    return Err(StatusCode::BAD_REQUEST);
                }
            }
        }
    };

    match decode_token(&state.auth.jwt_secret, &token) {
        Ok(claims) if claims.kind == TOKEN_KIND_ACCESS => {
            req.extensions_mut().insert(AuthContext {
                user_id: claims.uid,
                email: claims.sub,
                role: claims.role,
            });
            Ok(next.run(req).await)
        }
        Ok(_) => {
            warn!(path = %path, "refresh token presented where an access token is required");
            Err(StatusCode::UNAUTHORIZED)
        }
        Err(e) => {
            tracing::error!(path = %path, err = %e, "token validation failed");
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}
