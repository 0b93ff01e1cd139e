use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::validation::{self, reject_control_characters, Violation};

/// Stock assigned when a create request leaves it out.
pub const DEFAULT_STOCK: i32 = 0;

/// Core product entity, exactly as stored in the `products` table.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub price: f64,
    pub stock: i32,
}

/// Parses a `:id` path segment. Anything that is not an `i32` is a client error,
/// decided here so that no query ever runs with a malformed id.
pub fn parse_product_id(raw: &str) -> AppResult<i32> {
    raw.parse::<i32>().map_err(|_| invalid_product_id())
}

pub fn invalid_product_id() -> AppError {
    AppError::BadRequest("Invalid product ID".to_string())
}

// ── Request payloads ─────────────────────────────────────────────────────────

/// Body of `POST /products`. Every field is optional at the type level so a
/// missing `name` or `price` surfaces as a violation rather than a JSON error.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreateProduct {
    #[validate(
        required(message = "name is required"),
        length(min = 1, max = 255, message = "name must be between 1 and 255 characters"),
        custom(function = "reject_control_characters")
    )]
    pub name: Option<String>,
    #[validate(
        required(message = "price is required"),
        range(min = 0.0, message = "price must be non-negative")
    )]
    pub price: Option<f64>,
    #[validate(range(min = 0, message = "stock must be non-negative"))]
    pub stock: Option<i32>,
}

/// Body of `PUT /products/:id`; absent fields keep their stored value.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProduct {
    #[validate(
        length(min = 1, max = 255, message = "name must be between 1 and 255 characters"),
        custom(function = "reject_control_characters")
    )]
    pub name: Option<String>,
    #[validate(range(min = 0.0, message = "price must be non-negative"))]
    pub price: Option<f64>,
    #[validate(range(min = 0, message = "stock must be non-negative"))]
    pub stock: Option<i32>,
}

/// A fully populated, validated insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    pub stock: i32,
}

impl TryFrom<CreateProduct> for NewProduct {
    type Error = Vec<Violation>;

    fn try_from(payload: CreateProduct) -> Result<Self, Self::Error> {
        let violations = validation::validate_create(&payload);
        match (payload.name, payload.price) {
            (Some(name), Some(price)) if violations.is_empty() => Ok(NewProduct {
                name,
                price,
                stock: payload.stock.unwrap_or(DEFAULT_STOCK),
            }),
            _ => Err(violations),
        }
    }
}
