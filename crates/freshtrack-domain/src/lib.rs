//! FreshTrack Domain Layer
//!
//! Core value types and collaborator seams for the FreshTrack inventory
//! tracker. Infrastructure (SQLite, HTTP, session storage, terminal I/O)
//! lives in the other crates and plugs in through the traits in [`traits`].
//!
//! ## Key Concepts
//!
//! - **Product**: a perishable item owned by exactly one user, with a plain
//!   calendar expiry date
//! - **Category**: one of a fixed set of labels, defaulting to "Other"
//! - **Expiry status**: expired / expiring / fresh, derived from today's date
//! - **Form fields**: the in-progress values of the add-product form, which
//!   double as the draft snapshot carried across a scan round trip
//! - **Scan kind / scan result**: which field a photograph should fill, and
//!   the text extracted for it

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod category;
pub mod form;
pub mod image;
pub mod listing;
pub mod product;
pub mod status;
pub mod traits;

// Re-exports for convenience
pub use category::Category;
pub use form::{FormFields, ScanKind, ScanResult};
pub use image::StillImage;
pub use listing::{InventoryStats, ProductFilter};
pub use product::{NewProduct, Product, ProductId, UserId};
pub use status::ExpiryStatus;
