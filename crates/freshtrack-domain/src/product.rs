//! Product module - the tracked unit of inventory

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Category;

/// Unique identifier for a product based on UUIDv7
///
/// UUIDv7 keeps identifiers roughly creation-ordered, which makes the
/// `created_at` column and the id agree when rows are inspected by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProductId(u128);

impl ProductId {
    /// Generate a new UUIDv7-based ProductId
    ///
    /// # Examples
    ///
    /// ```
    /// use freshtrack_domain::ProductId;
    ///
    /// let id = ProductId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create a ProductId from a raw u128 value (storage deserialization)
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse a ProductId from its hyphenated string form
    ///
    /// # Examples
    ///
    /// ```
    /// use freshtrack_domain::ProductId;
    ///
    /// let id = ProductId::new();
    /// let parsed = ProductId::from_string(&id.to_string()).unwrap();
    /// assert_eq!(id, parsed);
    /// ```
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid product id: {}", e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for ProductId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// Opaque identity of an authenticated user
///
/// The domain never interprets the value; it only scopes rows by it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    /// Wrap an identity handed out by the auth collaborator
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identity
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored product row
///
/// Every product belongs to exactly one user and always carries an expiry
/// date without time-of-day.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Unique identifier
    pub id: ProductId,

    /// Owning user
    pub owner: UserId,

    /// Display name (trimmed, never empty)
    pub name: String,

    /// Category label
    pub category: Category,

    /// Expiry (or best-before) date
    pub expiry_date: NaiveDate,

    /// Optional free-text notes; empty input is stored as `None`
    pub notes: Option<String>,

    /// When the row was created
    pub created_at: DateTime<Utc>,
}

/// A validated product awaiting insertion
///
/// Produced by the form controller after validation; the store assigns the
/// id and creation timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    /// Owning user
    pub owner: UserId,
    /// Trimmed, non-empty name
    pub name: String,
    /// Category label
    pub category: Category,
    /// Expiry date
    pub expiry_date: NaiveDate,
    /// Notes, `None` when the user left the field blank
    pub notes: Option<String>,
}

impl NewProduct {
    /// Materialize the row with a fresh id and creation timestamp
    pub fn into_product(self, created_at: DateTime<Utc>) -> Product {
        Product {
            id: ProductId::new(),
            owner: self.owner,
            name: self.name,
            category: self.category,
            expiry_date: self.expiry_date,
            notes: self.notes,
            created_at,
        }
    }
}
