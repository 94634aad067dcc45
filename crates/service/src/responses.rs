//! Response envelopes shared by every service operation.
//!
//! All success payloads go out as `{message, data}`; message builders keep
//! the wording consistent across entities.

use serde::{Deserialize, Serialize};

/// Standard response wrapper combining a human-readable message and a payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub message: String,
    pub data: T,
}

/// Listing envelope: `Page {page} with {limit} {noun}`.
pub fn page_success<T>(noun: &str, page: u32, limit: u32, data: Vec<T>) -> Envelope<Vec<T>> {
    Envelope { message: format!("Page {} with {} {}", page, limit, noun), data }
}

pub fn get_single_success<T>(title: &str, id: i32, data: T) -> Envelope<T> {
    Envelope { message: format!("Details for {} with id {}", title, id), data }
}

pub fn create_success<T>(title: &str, id: i32, data: T) -> Envelope<T> {
    Envelope { message: format!("Created {} with id {}", title, id), data }
}

pub fn update_success<T>(title: &str, id: i32, data: T) -> Envelope<T> {
    Envelope { message: format!("Updated {} with id {}", title, id), data }
}

pub fn delete_success<T>(title: &str, id: i32, data: T) -> Envelope<T> {
    Envelope { message: format!("Deleted {} with id {}", title, id), data }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_message_names_page_and_limit() {
        let env = page_success::<i32>("products", 2, 10, vec![]);
        assert_eq!(env.message, "Page 2 with 10 products");
        assert!(env.data.is_empty());
    }

    #[test]
    fn entity_messages_carry_title_and_id() {
        assert_eq!(get_single_success("Red Shoe", 1, ()).message, "Details for Red Shoe with id 1");
        assert_eq!(create_success("Red Shoe", 1, ()).message, "Created Red Shoe with id 1");
        assert_eq!(update_success("Red Shoe", 1, ()).message, "Updated Red Shoe with id 1");
        assert_eq!(delete_success("Red Shoe", 1, ()).message, "Deleted Red Shoe with id 1");
    }

    #[test]
    fn envelope_serializes_flat() {
        let env = page_success("products", 1, 1, vec![7]);
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(json["message"], "Page 1 with 1 products");
        assert_eq!(json["data"][0], 7);
    }
}
