use axum::{extract::{Extension, Path, Query, State}, Json};
use serde::Deserialize;
use tracing::info;

use service::categories::{self, CategoryCreate, CategoryUpdate};
use service::pagination::Pagination;
use service::responses::Envelope;

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
    get, path = "/categories", tag = "categories",
    params(ListQuery),
    responses(
        (status = 200, description = "List OK"),
        (status = 500, description = "List Failed")
    )
)]
pub async fn list(State(state): State<ServerState>, Query(q): Query<ListQuery>) -> Result<Json<Envelope<Vec<models::category::Model>>>, ApiError> {
    let env = categories::list_categories(&state.db, Pagination { page: q.page, limit: q.limit }, &q.search).await?;
    Ok(Json(env))
}

#[utoipa::path(
    get, path = "/categories/{id}", tag = "categories",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "OK"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get(State(state): State<ServerState>, Path(id): Path<i32>) -> Result<Json<Envelope<models::category::Model>>, ApiError> {
    let env = categories::get_category(&state.db, id).await?;
    Ok(Json(env))
}

#[utoipa::path(
    post, path = "/categories", tag = "categories",
    request_body = crate::openapi::CategoryRequest,
    responses(
        (status = 200, description = "Created"),
        (status = 400, description = "Validation Error")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Json(input): Json<CategoryCreate>,
) -> Result<Json<Envelope<models::category::Model>>, ApiError> {
    require_admin(&ctx)?;
    let env = categories::create_category(&state.db, input).await?;
    info!(id = env.data.id, by = ctx.user_id, "created category");
    Ok(Json(env))
}

#[utoipa::path(
    put, path = "/categories/{id}", tag = "categories",
    params(("id" = i32, Path, description = "Category ID")),
    request_body = crate::openapi::CategoryRequest,
    responses(
        (status = 200, description = "Updated"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i32>,
    Json(input): Json<CategoryUpdate>,
) -> Result<Json<Envelope<models::category::Model>>, ApiError> {
    require_admin(&ctx)?;
    let env = categories::update_category(&state.db, id, input).await?;
    info!(id, by = ctx.user_id, "updated category");
    Ok(Json(env))
}

#[utoipa::path(
    delete, path = "/categories/{id}", tag = "categories",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i32>,
) -> Result<Json<Envelope<models::category::Model>>, ApiError> {
    require_admin(&ctx)?;
    let env = categories::delete_category(&state.db, id).await?;
    info!(id, by = ctx.user_id, "deleted category");
    Ok(Json(env))
}
