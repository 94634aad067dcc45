use axum::{extract::{Extension, Path, Query, State}, Json};
use serde::Deserialize;
use tracing::info;

use service::pagination::Pagination;
use service::responses::Envelope;
use service::users::{self, UserCreate, UserUpdate};

use crate::errors::ApiError;
use crate::routes::auth::{require_admin, AuthContext, ServerState};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ListQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub search: String,
}

fn default_page() -> u32 { 1 }
fn default_limit() -> u32 { 20 }

#[utoipa::path(
    get, path = "/users", tag = "users",
    params(ListQuery),
    responses(
        (status = 200, description = "List OK"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn list(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Envelope<Vec<models::user::Model>>>, ApiError> {
    require_admin(&ctx)?;
    let env = users::list_users(&state.db, Pagination { page: q.page, limit: q.limit }, &q.search).await?;
    Ok(Json(env))
}

#[utoipa::path(
    get, path = "/users/{id}", tag = "users",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "OK"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i32>,
) -> Result<Json<Envelope<models::user::Model>>, ApiError> {
    require_admin(&ctx)?;
    let env = users::get_user(&state.db, id).await?;
    Ok(Json(env))
}

#[utoipa::path(
    post, path = "/users", tag = "users",
    request_body = crate::openapi::UserCreateRequest,
    responses(
        (status = 200, description = "Created"),
        (status = 400, description = "Validation Error"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Json(input): Json<UserCreate>,
) -> Result<Json<Envelope<models::user::Model>>, ApiError> {
    require_admin(&ctx)?;
    let env = users::create_user(&state.db, input).await?;
    info!(id = env.data.id, by = ctx.user_id, "created user");
    Ok(Json(env))
}

#[utoipa::path(
    put, path = "/users/{id}", tag = "users",
    params(("id" = i32, Path, description = "User ID")),
    request_body = crate::openapi::UserUpdateRequest,
    responses(
        (status = 200, description = "Updated"),
        (status = 400, description = "Validation Error"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i32>,
    Json(input): Json<UserUpdate>,
) -> Result<Json<Envelope<models::user::Model>>, ApiError> {
    require_admin(&ctx)?;
    let env = users::update_user(&state.db, id, input).await?;
    info!(id, by = ctx.user_id, "updated user");
    Ok(Json(env))
}

#[utoipa::path(
    delete, path = "/users/{id}", tag = "users",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i32>,
) -> Result<Json<Envelope<models::user::Model>>, ApiError> {
    require_admin(&ctx)?;
    let env = users::delete_user(&state.db, id).await?;
    info!(id, by = ctx.user_id, "deleted user");
    Ok(Json(env))
}
