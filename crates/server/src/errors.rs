use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use models::errors::ModelError;
use service::errors::ServiceError;

/// JSON API error: explicit status, short title, optional detail.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub title: String,
    pub detail: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, title: &str, detail: Option<String>) -> Self {
        Self { status, title: title.to_string(), detail }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({"error": self.title, "detail": self.detail});
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match &e {
            ServiceError::NotFound(_) => {
                ApiError::new(StatusCode::NOT_FOUND, "Not Found", Some(e.to_string()))
            }
            ServiceError::Validation(_) | ServiceError::Model(ModelError::Validation(_)) => {
                ApiError::new(StatusCode::BAD_REQUEST, "Validation Error", Some(e.to_string()))
            }
            ServiceError::Db(_) | ServiceError::Internal(_) | ServiceError::Model(ModelError::Db(_)) => {
                error!(err = %e, "service failure");
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Error", Some(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let api: ApiError = ServiceError::not_found("Product", 9).into();
        assert_eq!(api.status, StatusCode::NOT_FOUND);
        assert!(api.detail.unwrap().contains("Product with id 9"));
    }

    #[test]
    fn validation_maps_to_400() {
        let api: ApiError = ServiceError::Validation("bad".into()).into();
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
    }
}
