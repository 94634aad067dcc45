use axum::{extract::{Extension, Path, Query, State}, Json};
use serde::Deserialize;
use tracing::info;

use service::carts::{self, CartCreate, CartUpdate, CartView};
use service::pagination::Pagination;
use service::responses::Envelope;

use crate::errors::ApiError;
use crate::routes::auth::{AuthContext, ServerState};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ListQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 { 1 }
fn default_limit() -> u32 { 20 }

#[utoipa::path(
    get, path = "/carts", tag = "carts",
    params(ListQuery),
    responses(
        (status = 200, description = "List OK"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Envelope<Vec<CartView>>>, ApiError> {
    let env = carts::list_carts(&state.db, ctx.user_id, Pagination { page: q.page, limit: q.limit }).await?;
    Ok(Json(env))
}

#[utoipa::path(
    get, path = "/carts/{id}", tag = "carts",
    params(("id" = i32, Path, description = "Cart ID")),
    responses(
        (status = 200, description = "OK"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i32>,
) -> Result<Json<Envelope<CartView>>, ApiError> {
    let env = carts::get_cart(&state.db, ctx.user_id, id).await?;
    Ok(Json(env))
}

#[utoipa::path(
    post, path = "/carts", tag = "carts",
    request_body = crate::openapi::CartRequest,
    responses(
        (status = 200, description = "Created"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Product Not Found")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Json(input): Json<CartCreate>,
) -> Result<Json<Envelope<CartView>>, ApiError> {
    let env = carts::create_cart(&state.db, ctx.user_id, input).await?;
    info!(id = env.data.id, user_id = ctx.user_id, "created cart");
    Ok(Json(env))
}

#[utoipa::path(
    put, path = "/carts/{id}", tag = "carts",
    params(("id" = i32, Path, description = "Cart ID")),
    request_body = crate::openapi::CartRequest,
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
    Json(input): Json<CartUpdate>,
) -> Result<Json<Envelope<CartView>>, ApiError> {
    let env = carts::update_cart(&state.db, ctx.user_id, id, input).await?;
    info!(id, user_id = ctx.user_id, "updated cart");
    Ok(Json(env))
}

#[utoipa::path(
    delete, path = "/carts/{id}", tag = "carts",
    params(("id" = i32, Path, description = "Cart ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i32>,
) -> Result<Json<Envelope<models::cart::Model>>, ApiError> {
    let env = carts::delete_cart(&state.db, ctx.user_id, id).await?;
    info!(id, user_id = ctx.user_id, "deleted cart");
    Ok(Json(env))
}
