use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{NewProduct, Product, UpdateProduct};

#[cfg(test)]
pub mod memory;
mod postgres;

pub use postgres::PgProductRepository;

/// Data access for the `products` table.
///
/// Absence is a value, not an error: lookups and mutations on an id with no
/// row return `None` / `false`. `Err` is reserved for connection or query
/// failures.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// All products in primary-key order.
    async fn list_all(&self) -> AppResult<Vec<Product>>;

    async fn get_by_id(&self, id: i32) -> AppResult<Option<Product>>;

    async fn insert(&self, product: &NewProduct) -> AppResult<Product>;

    /// Applies the fields present in `changes`, keeping the rest.
    async fn update(&self, id: i32, changes: &UpdateProduct) -> AppResult<Option<Product>>;

    /// Returns whether a row was actually deleted.
    async fn delete_by_id(&self, id: i32) -> AppResult<bool>;

    /// Trivial round trip used by the health check.
    async fn ping(&self) -> AppResult<()>;
}
