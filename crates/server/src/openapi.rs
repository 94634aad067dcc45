use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct SignupRequest { pub username: String, pub email: String, pub full_name: String, pub password: String }

#[derive(ToSchema)]
pub struct LoginRequest { pub email: String, pub password: String }

#[derive(ToSchema)]
pub struct RefreshRequest { pub refresh_token: String }

#[derive(ToSchema)]
pub struct ProductCreateRequest {
    pub title: String,
    pub price: i64,
    pub old_price: Option<i64>,
    pub description: String,
    pub image: Option<String>,
    pub rating: Option<f32>,
    pub category_id: i32,
}

#[derive(ToSchema)]
pub struct ProductUpdateRequest {
    pub title: String,
    pub price: i64,
    pub old_price: Option<i64>,
    pub description: String,
    pub image: Option<String>,
    pub rating: Option<f32>,
    pub category_id: Option<i32>,
}

#[derive(ToSchema)]
pub struct CategoryRequest { pub name: String }

#[derive(ToSchema)]
pub struct CartItemRequest { pub product_id: i32, pub quantity: i32 }

#[derive(ToSchema)]
pub struct CartRequest { pub items: Vec<CartItemRequest> }

#[derive(ToSchema)]
pub struct UserCreateRequest {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password: String,
    pub role: Option<String>,
}

#[derive(ToSchema)]
pub struct UserUpdateRequest {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub is_active: bool,
}

#[derive(ToSchema)]
pub struct AccountUpdateRequest {
    pub email: String,
    pub full_name: String,
    pub password: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::signup,
        crate::routes::auth::login,
        crate::routes::auth::refresh,
        crate::routes::auth::logout,
        crate::routes::products::list,
        crate::routes::products::get,
        crate::routes::products::create,
        crate::routes::products::update,
        crate::routes::products::delete,
        crate::routes::categories::list,
        crate::routes::categories::get,
        crate::routes::categories::create,
        crate::routes::categories::update,
        crate::routes::categories::delete,
        crate::routes::carts::list,
        crate::routes::carts::get,
        crate::routes::carts::create,
        crate::routes::carts::update,
        crate::routes::carts::delete,
        crate::routes::users::list,
        crate::routes::users::get,
        crate::routes::users::create,
        crate::routes::users::update,
        crate::routes::users::delete,
        crate::routes::accounts::me,
        crate::routes::accounts::update,
        crate::routes::accounts::delete,
    ),
    components(
        schemas(
            HealthResponse,
            SignupRequest,
            LoginRequest,
            RefreshRequest,
            ProductCreateRequest,
            ProductUpdateRequest,
            CategoryRequest,
            CartItemRequest,
            CartRequest,
            UserCreateRequest,
            UserUpdateRequest,
            AccountUpdateRequest,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "products"),
        (name = "categories"),
        (name = "carts"),
        (name = "users"),
        (name = "accounts")
    )
)]
pub struct ApiDoc;
