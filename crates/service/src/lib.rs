//! Service layer providing business-oriented CRUD operations on top of models.
//! - Separates business logic from data access.
//! - Reuses validation and entity definitions in `models` crate.
//! - Every operation takes an explicit database handle; there is no shared
//!   session state.

pub mod errors;
pub mod pagination;
pub mod responses;
pub mod products;
pub mod categories;
pub mod carts;
pub mod users;
pub mod accounts;
pub mod auth;
pub mod runtime;
#[cfg(test)]
pub mod test_support;
