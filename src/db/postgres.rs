use async_trait::async_trait;
use sqlx::PgPool;

use super::ProductRepository;
use crate::error::AppResult;
use crate::models::{NewProduct, Product, UpdateProduct};

#[derive(Debug, Clone)]
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn list_all(&self) -> AppResult<Vec<Product>> {
        // `price` may be NUMERIC in the table; it is always read back as float8.
        let products = sqlx::query_as::<_, Product>(
            "SELECT id, name, price::float8 AS price, stock FROM products ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT id, name, price::float8 AS price, stock FROM products WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    async fn insert(&self, product: &NewProduct) -> AppResult<Product> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, price, stock)
            VALUES ($1, $2::float8, $3)
            RETURNING id, name, price::float8 AS price, stock
            "#,
        )
        .bind(&product.name)
        .bind(product.price)
        .bind(product.stock)
        .fetch_one(&self.pool)
        .await?;

        Ok(product)
    }

    async fn update(&self, id: i32, changes: &UpdateProduct) -> AppResult<Option<Product>> {
        // One statement: the RETURNING row doubles as the existence check.
        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET name  = COALESCE($1, name),
                price = COALESCE($2::float8, price::float8),
                stock = COALESCE($3, stock)
            WHERE id = $4
            RETURNING id, name, price::float8 AS price, stock
            "#,
        )
        .bind(changes.name.as_deref())
        .bind(changes.price)
        .bind(changes.stock)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    async fn delete_by_id(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
