//! Category module - the fixed set of product categories

use serde::{Deserialize, Serialize};
use std::fmt;

/// Product category
///
/// The set is closed; anything a user cannot place lands in `Other`, which is
/// also the value a fresh form starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    /// Milk, cheese, yogurt
    Dairy,
    /// Fresh meat and poultry
    #[serde(rename = "Meat & Poultry")]
    MeatAndPoultry,
    /// Vegetables
    Vegetables,
    /// Fruits
    Fruits,
    /// Drinks
    Beverages,
    /// Snacks
    Snacks,
    /// Tins and jars
    #[serde(rename = "Canned Goods")]
    CannedGoods,
    /// Frozen food
    Frozen,
    /// Bread and pastries
    Bakery,
    /// Sauces and spreads
    Condiments,
    /// Medicine
    Medicine,
    /// Toiletries and cosmetics
    #[serde(rename = "Personal Care")]
    PersonalCare,
    /// Anything else
    #[default]
    Other,
}

impl Category {
    /// Every category, in display order
    pub const ALL: [Category; 13] = [
        Category::Dairy,
        Category::MeatAndPoultry,
        Category::Vegetables,
        Category::Fruits,
        Category::Beverages,
        Category::Snacks,
        Category::CannedGoods,
        Category::Frozen,
        Category::Bakery,
        Category::Condiments,
        Category::Medicine,
        Category::PersonalCare,
        Category::Other,
    ];

    /// Display label, also the stored representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Dairy => "Dairy",
            Category::MeatAndPoultry => "Meat & Poultry",
            Category::Vegetables => "Vegetables",
            Category::Fruits => "Fruits",
            Category::Beverages => "Beverages",
            Category::Snacks => "Snacks",
            Category::CannedGoods => "Canned Goods",
            Category::Frozen => "Frozen",
            Category::Bakery => "Bakery",
            Category::Condiments => "Condiments",
            Category::Medicine => "Medicine",
            Category::PersonalCare => "Personal Care",
            Category::Other => "Other",
        }
    }

    /// Parse a label, ignoring case and surrounding whitespace
    pub fn parse(s: &str) -> Option<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid category: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_other() {
        assert_eq!(Category::default(), Category::Other);
    }

    #[test]
    fn test_parse_round_trips_every_label() {
        for category in Category::ALL {
            assert_eq!(Category::parse(category.as_str()), Some(category));
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Category::parse("meat & poultry"), Some(Category::MeatAndPoultry));
        assert_eq!(Category::parse("  DAIRY "), Some(Category::Dairy));
        assert_eq!(Category::parse("Cereal"), None);
    }

    #[test]
    fn test_serde_uses_display_label() {
        let json = serde_json::to_string(&Category::CannedGoods).unwrap();
        assert_eq!(json, "\"Canned Goods\"");
        let parsed: Category = serde_json::from_str("\"Personal Care\"").unwrap();
        assert_eq!(parsed, Category::PersonalCare);
    }
}
