//! In-process stand-in for the Postgres repository, used by router tests.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::ProductRepository;
use crate::error::{AppError, AppResult};
use crate::models::{NewProduct, Product, UpdateProduct};

#[derive(Debug, Default)]
struct Table {
    rows: Vec<Product>,
    next_id: i32,
}

#[derive(Debug, Default)]
pub struct MemoryProductRepository {
    table: RwLock<Table>,
    disconnected: AtomicBool,
    panic_on_list: AtomicBool,
}

impl MemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds rows the way a fresh `SERIAL` table would number them.
    pub async fn seed(&self, rows: &[(&str, f64, i32)]) {
        for (name, price, stock) in rows {
            self.insert(&NewProduct {
                name: name.to_string(),
                price: *price,
                stock: *stock,
            })
            .await
            .unwrap();
        }
    }

    /// Makes every call fail as if the database were unreachable.
    pub fn disconnect(&self) {
        self.disconnected.store(true, Ordering::SeqCst);
    }

    pub fn panic_on_list(&self) {
        self.panic_on_list.store(true, Ordering::SeqCst);
    }

    fn check_connection(&self) -> AppResult<()> {
        if self.disconnected.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for MemoryProductRepository {
    async fn list_all(&self) -> AppResult<Vec<Product>> {
        if self.panic_on_list.load(Ordering::SeqCst) {
            panic!("simulated handler failure");
        }
        self.check_connection()?;
        Ok(self.table.read().await.rows.clone())
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Option<Product>> {
        self.check_connection()?;
        let table = self.table.read().await;
        Ok(table.rows.iter().find(|p| p.id == id).cloned())
    }

    async fn insert(&self, product: &NewProduct) -> AppResult<Product> {
        self.check_connection()?;
        let mut table = self.table.write().await;
        table.next_id += 1;
        let created = Product {
            id: table.next_id,
            name: product.name.clone(),
            price: product.price,
            stock: product.stock,
        };
        table.rows.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: i32, changes: &UpdateProduct) -> AppResult<Option<Product>> {
        self.check_connection()?;
        let mut table = self.table.write().await;
        let Some(row) = table.rows.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        if let Some(name) = &changes.name {
            row.name = name.clone();
        }
        if let Some(price) = changes.price {
            row.price = price;
        }
        if let Some(stock) = changes.stock {
            row.stock = stock;
        }
        Ok(Some(row.clone()))
    }

    async fn delete_by_id(&self, id: i32) -> AppResult<bool> {
        self.check_connection()?;
        let mut table = self.table.write().await;
        let before = table.rows.len();
        table.rows.retain(|p| p.id != id);
        Ok(table.rows.len() < before)
    }

    async fn ping(&self) -> AppResult<()> {
        self.check_connection()
    }
}
