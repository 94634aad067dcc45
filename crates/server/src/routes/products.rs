use axum::{extract::{Extension, Path, Query, State}, Json};
use serde::Deserialize;
use tracing::info;

use service::pagination::Pagination;
use service::products::{self, ProductCreate, ProductUpdate, ProductView};
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
    get, path = "/products", tag = "products",
    params(ListQuery),
    responses(
        (status = 200, description = "List OK"),
        (status = 500, description = "List Failed")
    )
)]
pub async fn list(State(state): State<ServerState>, Query(q): Query<ListQuery>) -> Result<Json<Envelope<Vec<ProductView>>>, ApiError> {
    let env = products::list_products(&state.db, Pagination { page: q.page, limit: q.limit }, &q.search).await?;
    Ok(Json(env))
}

#[utoipa::path(
    get, path = "/products/{id}", tag = "products",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "OK"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get(State(state): State<ServerState>, Path(id): Path<i32>) -> Result<Json<Envelope<models::product::Model>>, ApiError> {
    let env = products::get_product(&state.db, id).await?;
    Ok(Json(env))
}

#[utoipa::path(
    post, path = "/products", tag = "products",
    request_body = crate::openapi::ProductCreateRequest,
    responses(
        (status = 200, description = "Created"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Category Not Found")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Json(input): Json<ProductCreate>,
) -> Result<Json<Envelope<models::product::Model>>, ApiError> {
    require_admin(&ctx)?;
    let env = products::create_product(&state.db, input).await?;
    info!(id = env.data.id, by = ctx.user_id, "created product");
    Ok(Json(env))
}

#[utoipa::path(
    put, path = "/products/{id}", tag = "products",
    params(("id" = i32, Path, description = "Product ID")),
    request_body = crate::openapi::ProductUpdateRequest,
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
    Json(input): Json<ProductUpdate>,
) -> Result<Json<Envelope<models::product::Model>>, ApiError> {
    require_admin(&ctx)?;
    let env = products::update_product(&state.db, id, input).await?;
    info!(id, by = ctx.user_id, "updated product");
    Ok(Json(env))
}

#[utoipa::path(
    delete, path = "/products/{id}", tag = "products",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i32>,
) -> Result<Json<Envelope<models::product::Model>>, ApiError> {
    require_admin(&ctx)?;
    let env = products::delete_product(&state.db, id).await?;
    info!(id, by = ctx.user_id, "deleted product");
    Ok(Json(env))
}
