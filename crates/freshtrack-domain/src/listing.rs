//! Listing helpers: filters and summary counts over a user's products

use crate::status::ExpiryStatus;
use crate::{Category, Product};
use chrono::NaiveDate;

/// Criteria applied to an already-fetched product list
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Case-insensitive substring of the product name
    pub search: Option<String>,

    /// Only this category
    pub category: Option<Category>,

    /// Only this freshness status
    pub status: Option<ExpiryStatus>,
}

impl ProductFilter {
    /// Whether `product` passes every criterion on `today`
    pub fn matches(&self, product: &Product, today: NaiveDate) -> bool {
        let matches_search = match &self.search {
            Some(needle) => product
                .name
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            None => true,
        };
        let matches_category = self.category.map_or(true, |c| product.category == c);
        let matches_status = self
            .status
            .map_or(true, |s| ExpiryStatus::classify(product.expiry_date, today) == s);

        matches_search && matches_category && matches_status
    }

    /// Keep the matching products, preserving order
    pub fn apply<'a>(&self, products: &'a [Product], today: NaiveDate) -> Vec<&'a Product> {
        products.iter().filter(|p| self.matches(p, today)).collect()
    }
}

/// Counts shown above the product list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InventoryStats {
    /// All products
    pub total: usize,
    /// Past their date
    pub expired: usize,
    /// Expiring today or soon
    pub expiring: usize,
    /// Everything else
    pub fresh: usize,
}

impl InventoryStats {
    /// Tally `products` as of `today`
    pub fn compute(products: &[Product], today: NaiveDate) -> Self {
        products.iter().fold(Self::default(), |mut stats, p| {
            stats.total += 1;
            match ExpiryStatus::classify(p.expiry_date, today) {
                ExpiryStatus::Expired => stats.expired += 1,
                ExpiryStatus::Expiring => stats.expiring += 1,
                ExpiryStatus::Fresh => stats.fresh += 1,
            }
            stats
        })
    }
}

/// Distinct categories present in `products`, in first-seen order
pub fn categories_present(products: &[Product]) -> Vec<Category> {
    let mut seen = Vec::new();
    for product in products {
        if !seen.contains(&product.category) {
            seen.push(product.category);
        }
    }
    seen
}
