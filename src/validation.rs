//! Field rules for product payloads.
//!
//! The rules themselves are declared on the payload types with `validator`
//! derives; this module flattens the result into a sorted list of
//! [`Violation`]s so the outcome is deterministic and easy to render.

use std::borrow::Cow;

use serde::Serialize;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::models::{CreateProduct, UpdateProduct};

/// One reason a payload was rejected.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Create mode: `name` and `price` are mandatory, `stock` is checked if present.
pub fn validate_create(payload: &CreateProduct) -> Vec<Violation> {
    collect(payload.validate())
}

/// Partial-update mode: only the fields present are checked.
pub fn validate_update(payload: &UpdateProduct) -> Vec<Violation> {
    collect(payload.validate())
}

/// Postgres refuses NUL in text columns; other control characters have no
/// business in a product name either.
pub fn reject_control_characters(name: &str) -> Result<(), ValidationError> {
    if name.chars().any(char::is_control) {
        return Err(ValidationError::new("control_characters")
            .with_message(Cow::Borrowed("name must not contain control characters")));
    }
    Ok(())
}

fn collect(result: Result<(), ValidationErrors>) -> Vec<Violation> {
    let Err(errors) = result else {
        return Vec::new();
    };

    let mut violations: Vec<Violation> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field));
                Violation::new(field.to_string(), message)
            })
        })
        .collect();

    violations.sort();
    violations
}
