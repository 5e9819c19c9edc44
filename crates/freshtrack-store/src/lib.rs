//! FreshTrack Storage Layer
//!
//! Implements the `ProductStore` trait on SQLite, plus the session-scoped
//! storage that holds the add-product draft.
//!
//! # Examples
//!
//! ```no_run
//! use freshtrack_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for product operations
//! ```

#![warn(missing_docs)]

pub mod auth;
pub mod session;

pub use auth::StaticAuth;
pub use session::MemorySessionStorage;

use chrono::{DateTime, NaiveDate, Utc};
use freshtrack_domain::traits::ProductStore;
use freshtrack_domain::{Category, NewProduct, Product, ProductId, UserId};
use rusqlite::{params, Connection, Row};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Product not found (or not owned by the caller)
    #[error("Product not found: {0}")]
    NotFound(String),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

const DATE_FORMAT: &str = "%Y-%m-%d";

const SELECT_COLUMNS: &str =
    "SELECT id, owner, name, category, expiry_date, notes, created_at FROM products";

/// SQLite-based implementation of ProductStore
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Each thread should have its own
/// SqliteStore instance.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) a store at `path`
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    fn initialize_schema(&self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    fn id_to_bytes(id: ProductId) -> Vec<u8> {
        id.value().to_be_bytes().to_vec()
    }

    fn bytes_to_id(bytes: &[u8]) -> Result<ProductId, StoreError> {
        let arr: [u8; 16] = bytes.try_into().map_err(|_| {
            StoreError::InvalidData(format!(
                "Expected 16 bytes for ProductId, got {}",
                bytes.len()
            ))
        })?;
        Ok(ProductId::from_value(u128::from_be_bytes(arr)))
    }

    fn row_to_product(row: &Row<'_>) -> rusqlite::Result<Product> {
        let id_bytes: Vec<u8> = row.get(0)?;
        let id = Self::bytes_to_id(&id_bytes).map_err(|e| conversion_error(0, e))?;

        let category_label: String = row.get(3)?;
        let category = Category::parse(&category_label).ok_or_else(|| {
            conversion_error(
                3,
                StoreError::InvalidData(format!("Unknown category: {}", category_label)),
            )
        })?;

        let expiry_text: String = row.get(4)?;
        let expiry_date = NaiveDate::parse_from_str(&expiry_text, DATE_FORMAT).map_err(|e| {
            conversion_error(4, StoreError::InvalidData(format!("Bad expiry date: {}", e)))
        })?;

        let created_millis: i64 = row.get(6)?;
        let created_at = DateTime::<Utc>::from_timestamp_millis(created_millis).ok_or_else(|| {
            conversion_error(
                6,
                StoreError::InvalidData(format!("Bad timestamp: {}", created_millis)),
            )
        })?;

        Ok(Product {
            id,
            owner: UserId::new(row.get::<_, String>(1)?),
            name: row.get(2)?,
            category,
            expiry_date,
            notes: row.get(5)?,
            created_at,
        })
    }
}

fn conversion_error(column: usize, e: StoreError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(e))
}

impl ProductStore for SqliteStore {
    type Error = StoreError;

    fn create(&mut self, product: NewProduct) -> Result<Product, Self::Error> {
        if product.name.trim().is_empty() {
            return Err(StoreError::InvalidData("Product name is empty".to_string()));
        }

        let product = product.into_product(Utc::now());
        self.conn.execute(
            "INSERT INTO products (id, owner, name, category, expiry_date, notes, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                Self::id_to_bytes(product.id),
                product.owner.as_str(),
                &product.name,
                product.category.as_str(),
                product.expiry_date.format(DATE_FORMAT).to_string(),
                &product.notes,
                product.created_at.timestamp_millis(),
            ],
        )?;

        info!(id = %product.id, owner = %product.owner, "Product created");
        Ok(product)
    }

    fn list(&self, owner: &UserId) -> Result<Vec<Product>, Self::Error> {
        let sql = format!(
            "{} WHERE owner = ?1 ORDER BY expiry_date ASC, created_at ASC",
            SELECT_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let products = stmt
            .query_map(params![owner.as_str()], Self::row_to_product)?
            .collect::<Result<Vec<_>, _>>()?;

        debug!(owner = %owner, count = products.len(), "Listed products");
        Ok(products)
    }

    fn delete(&mut self, owner: &UserId, id: ProductId) -> Result<(), Self::Error> {
        let removed = self.conn.execute(
            "DELETE FROM products WHERE id = ?1 AND owner = ?2",
            params![Self::id_to_bytes(id), owner.as_str()],
        )?;

        if removed == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }

        info!(id = %id, owner = %owner, "Product deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_bytes_round_trip() {
        let id = ProductId::new();
        let bytes = SqliteStore::id_to_bytes(id);
        assert_eq!(SqliteStore::bytes_to_id(&bytes).unwrap(), id);
    }

    #[test]
    fn test_bytes_to_id_rejects_wrong_length() {
        let result = SqliteStore::bytes_to_id(&[1, 2, 3]);
        assert!(matches!(result, Err(StoreError::InvalidData(_))));
    }

    #[test]
    fn test_create_rejects_blank_name() {
        let mut store = SqliteStore::new(":memory:").unwrap();
        let result = store.create(NewProduct {
            owner: UserId::new("u"),
            name: "   ".to_string(),
            category: Category::Other,
            expiry_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            notes: None,
        });
        assert!(matches!(result, Err(StoreError::InvalidData(_))));
    }
}
