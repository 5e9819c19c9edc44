//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::{NewProduct, Product, ProductId, UserId};

/// Trait for storing and retrieving products
///
/// Implemented by the infrastructure layer (freshtrack-store). Every
/// operation is scoped to one owner; no call can see another user's rows.
pub trait ProductStore {
    /// Error type for store operations
    type Error;

    /// Insert a validated product and return the stored row
    fn create(&mut self, product: NewProduct) -> Result<Product, Self::Error>;

    /// All products owned by `owner`, ordered by expiry date ascending
    fn list(&self, owner: &UserId) -> Result<Vec<Product>, Self::Error>;

    /// Delete one of `owner`'s products
    fn delete(&mut self, owner: &UserId, id: ProductId) -> Result<(), Self::Error>;
}

/// Session-scoped key-value storage
///
/// Holds the add-product draft across the navigation to the scanner. Values
/// live until the session ends; nothing here is durable or shared between
/// devices. Methods take `&self` so the slot can be shared by reference
/// between the views that outlive each other.
pub trait SessionStorage {
    /// Read a value
    fn get_item(&self, key: &str) -> Option<String>;

    /// Write a value, replacing any previous one
    fn set_item(&self, key: &str, value: String);

    /// Delete a value; missing keys are ignored
    fn remove_item(&self, key: &str);
}

/// Trait for the authentication collaborator
///
/// The core only asks who is signed in; credentials never pass through it.
pub trait AuthProvider {
    /// Error type for auth operations
    type Error;

    /// The signed-in user, if any
    fn current_user(&self) -> Option<UserId>;

    /// End the current session
    fn sign_out(&mut self) -> Result<(), Self::Error>;
}

impl<T: SessionStorage + ?Sized> SessionStorage for &T {
    fn get_item(&self, key: &str) -> Option<String> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: String) {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) {
        (**self).remove_item(key)
    }
}
