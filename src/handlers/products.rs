use std::time::Instant;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::{
    error::{AppError, AppResult},
    models::{
        invalid_product_id, parse_product_id, CreateProduct, NewProduct, Product, UpdateProduct,
    },
    validation, AppState,
};

/// The `:id` segment as an integer. A segment axum cannot even decode (bad
/// percent-encoding, invalid UTF-8) gets the same answer as `abc`.
fn product_id(path: Result<Path<String>, PathRejection>) -> AppResult<i32> {
    match path {
        Ok(Path(raw)) => parse_product_id(&raw),
        Err(_) => Err(invalid_product_id()),
    }
}

fn product_not_found() -> AppError {
    AppError::NotFound("Product not found".to_string())
}

// ── List ──────────────────────────────────────────────────────────────────────

pub async fn list_products(State(state): State<AppState>) -> AppResult<Json<Vec<Product>>> {
    let start = Instant::now();
    let products = state.products.list_all().await?;

    info!(
        count = products.len(),
        elapsed_ms = start.elapsed().as_millis(),
        "Listed products"
    );

    Ok(Json(products))
}

// ── Create ────────────────────────────────────────────────────────────────────

pub async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<CreateProduct>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let Json(payload) = payload?;
    let new_product = NewProduct::try_from(payload).map_err(AppError::Validation)?;

    let start = Instant::now();
    let product = state.products.insert(&new_product).await?;

    info!(
        id = product.id,
        name = %product.name,
        elapsed_ms = start.elapsed().as_millis(),
        "Created product"
    );

    Ok((StatusCode::CREATED, Json(product)))
}

// ── Get by ID ─────────────────────────────────────────────────────────────────

pub async fn get_product(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> AppResult<Json<Product>> {
    let id = product_id(path)?;

    let start = Instant::now();
    let product = state
        .products
        .get_by_id(id)
        .await?
        .ok_or_else(product_not_found)?;

    info!(id, elapsed_ms = start.elapsed().as_millis(), "Fetched product");

    Ok(Json(product))
}

// ── Update ────────────────────────────────────────────────────────────────────

pub async fn update_product(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<UpdateProduct>, JsonRejection>,
) -> AppResult<Json<Product>> {
    let id = product_id(path)?;
    let Json(changes) = payload?;

    let violations = validation::validate_update(&changes);
    if !violations.is_empty() {
        return Err(AppError::Validation(violations));
    }

    let start = Instant::now();
    let product = state
        .products
        .update(id, &changes)
        .await?
        .ok_or_else(product_not_found)?;

    info!(id, elapsed_ms = start.elapsed().as_millis(), "Updated product");

    Ok(Json(product))
}

// ── Delete ────────────────────────────────────────────────────────────────────

pub async fn delete_product(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> AppResult<StatusCode> {
    let id = product_id(path)?;

    let start = Instant::now();
    if !state.products.delete_by_id(id).await? {
        return Err(product_not_found());
    }

    info!(id, elapsed_ms = start.elapsed().as_millis(), "Deleted product");

    Ok(StatusCode::NO_CONTENT)
}
