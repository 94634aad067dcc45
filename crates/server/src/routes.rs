use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

pub mod accounts;
pub mod auth;
pub mod carts;
pub mod categories;
pub mod products;
pub mod users;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK")))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: public browsing, auth endpoints,
/// authenticated cart/account routes and admin-only management routes.
pub fn build_router(cors: CorsLayer, state: auth::ServerState, static_dir: &str) -> Router {
    // Public routes (static assets + health)
    let public = Router::new()
        .nest_service("/static", ServeDir::new(static_dir))
        .route("/health", get(health));

    let product_routes = Router::new()
        .route("/products", get(products::list).post(products::create))
        .route("/products/:id", get(products::get).put(products::update).delete(products::delete));

    let category_routes = Router::new()
        .route("/categories", get(categories::list).post(categories::create))
        .route("/categories/:id", get(categories::get).put(categories::update).delete(categories::delete));

    let cart_routes = Router::new()
        .route("/carts", get(carts::list).post(carts::create))
        .route("/carts/:id", get(carts::get).put(carts::update).delete(carts::delete));

    let user_routes = Router::new()
        .route("/users", get(users::list).post(users::create))
        .route("/users/:id", get(users::get).put(users::update).delete(users::delete));

    let account_routes = Router::new()
        .route("/accounts/me", get(accounts::me).put(accounts::update).delete(accounts::delete));

    let auth_routes = Router::new()
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/logout", post(auth::logout));

    let swagger = SwaggerUi::new("/docs").url("/api-docs/openapi.json", crate::openapi::ApiDoc::openapi());

    // Compose
    public
        .merge(product_routes)
        .merge(category_routes)
        .merge(cart_routes)
        .merge(user_routes)
        .merge(account_routes)
        .merge(auth_routes)
        .merge(swagger)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_bearer_token_state,
        ))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // One span per request carrying method and path
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                // Status code and latency on the way out
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 5xx and friends get ERROR
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
