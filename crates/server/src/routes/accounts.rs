use axum::{extract::{Extension, State}, Json};
use tracing::info;

use service::accounts::{self, AccountUpdate};
use service::responses::Envelope;

use crate::errors::ApiError;
use crate::routes::auth::{AuthContext, ServerState};

#[utoipa::path(
    get, path = "/accounts/me", tag = "accounts",
    responses(
        (status = 200, description = "OK"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn me(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<Envelope<models::user::Model>>, ApiError> {
    let env = accounts::get_my_account(&state.db, ctx.user_id).await?;
    Ok(Json(env))
}

#[utoipa::path(
    put, path = "/accounts/me", tag = "accounts",
    request_body = crate::openapi::AccountUpdateRequest,
    responses(
        (status = 200, description = "Updated"),
        (status = 400, description = "Validation Error"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Json(input): Json<AccountUpdate>,
) -> Result<Json<Envelope<models::user::Model>>, ApiError> {
    let env = accounts::update_my_account(&state.db, ctx.user_id, input).await?;
    info!(user_id = ctx.user_id, "updated own account");
    Ok(Json(env))
}

#[utoipa::path(
    delete, path = "/accounts/me", tag = "accounts",
    responses(
        (status = 200, description = "Deleted"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<Envelope<models::user::Model>>, ApiError> {
    let env = accounts::delete_my_account(&state.db, ctx.user_id).await?;
    info!(user_id = ctx.user_id, "deleted own account");
    Ok(Json(env))
}
