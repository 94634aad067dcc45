use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("internal error: {0}")]
    Internal(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    /// Not-Found errors always name the entity kind and the id searched for.
    pub fn not_found(entity: &str, id: i32) -> Self {
        Self::NotFound(format!("{} with id {} not found", entity, id))
    }
}

#[cfg(test)]
mod tests {
    use super::ServiceError;

    #[test]
    fn not_found_names_entity_and_id() {
        let err = ServiceError::not_found("Product", 42);
        assert_eq!(err.to_string(), "not found: Product with id 42 not found");
    }
}
