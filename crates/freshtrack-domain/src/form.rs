//! Form fields, scan kinds and scan results
//!
//! `FormFields` is both the live state of the add-product form and the shape
//! of the draft snapshot that survives a trip to the scanner. Values are kept
//! as raw text (except the category) because the form must hold whatever the
//! user typed until they submit.

use crate::Category;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which form field a photograph is analyzed to fill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanKind {
    /// Read the product name off the packaging
    ProductName,
    /// Read the expiry / best-before date off the packaging
    ExpiryDate,
}

impl ScanKind {
    /// Wire name sent to the extraction endpoint
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanKind::ProductName => "product_name",
            ScanKind::ExpiryDate => "expiry_date",
        }
    }

    /// Parse a wire name
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "product_name" => Some(ScanKind::ProductName),
            "expiry_date" => Some(ScanKind::ExpiryDate),
            _ => None,
        }
    }

    /// The form field this kind fills
    pub fn field(&self) -> FormField {
        match self {
            ScanKind::ProductName => FormField::Name,
            ScanKind::ExpiryDate => FormField::ExpiryDate,
        }
    }

    /// Human name, e.g. for "Expiry date detected!"
    pub fn label(&self) -> &'static str {
        match self {
            ScanKind::ProductName => "Product name",
            ScanKind::ExpiryDate => "Expiry date",
        }
    }
}

impl fmt::Display for ScanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text extracted for one scan kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    /// Which field the text belongs to
    pub kind: ScanKind,
    /// Extracted text; an ISO date string for `ExpiryDate`
    pub text: String,
}

impl ScanResult {
    /// Create a scan result
    pub fn new(kind: ScanKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Identifies one field of the add-product form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    /// Product name
    Name,
    /// Category
    Category,
    /// Expiry date text
    ExpiryDate,
    /// Free-text notes
    Notes,
}

/// In-progress values of the add-product form
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormFields {
    /// Product name as typed
    #[serde(default)]
    pub name: String,
    /// Selected category
    #[serde(default)]
    pub category: Category,
    /// Expiry date as typed or scanned (expected `YYYY-MM-DD`)
    #[serde(default)]
    pub expiry_date: String,
    /// Notes as typed
    #[serde(default)]
    pub notes: String,
}

impl FormFields {
    /// True when every field still holds its default value
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// True when `field` still holds its default value
    pub fn is_default(&self, field: FormField) -> bool {
        match field {
            FormField::Name => self.name.is_empty(),
            FormField::Category => self.category == Category::default(),
            FormField::ExpiryDate => self.expiry_date.is_empty(),
            FormField::Notes => self.notes.is_empty(),
        }
    }

    /// Merge a restored draft without clobbering anything
    ///
    /// A draft value is copied into a field only when that field is still at
    /// its default and is not `reserved` for an incoming scan result. Returns
    /// the number of fields that were filled from the draft.
    pub fn merge_draft(&mut self, draft: FormFields, reserved: Option<FormField>) -> usize {
        let open = |fields: &FormFields, field: FormField| {
            fields.is_default(field) && reserved != Some(field)
        };
        let mut applied = 0;

        if open(&*self, FormField::Name) && !draft.name.is_empty() {
            self.name = draft.name;
            applied += 1;
        }
        if open(&*self, FormField::Category) && draft.category != Category::default() {
            self.category = draft.category;
            applied += 1;
        }
        if open(&*self, FormField::ExpiryDate) && !draft.expiry_date.is_empty() {
            self.expiry_date = draft.expiry_date;
            applied += 1;
        }
        if open(&*self, FormField::Notes) && !draft.notes.is_empty() {
            self.notes = draft.notes;
            applied += 1;
        }

        applied
    }

    /// Write a scan result into the field it targets
    ///
    /// Scanned text always wins over whatever the field held.
    pub fn apply_scan(&mut self, result: &ScanResult) {
        match result.kind {
            ScanKind::ProductName => self.name = result.text.clone(),
            ScanKind::ExpiryDate => self.expiry_date = result.text.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn milk_draft() -> FormFields {
        FormFields {
            name: "Milk".to_string(),
            category: Category::Dairy,
            expiry_date: "2025-12-31".to_string(),
            notes: "top shelf".to_string(),
        }
    }

    #[test]
    fn test_merge_into_empty_form_copies_everything() {
        let mut fields = FormFields::default();
        fields.merge_draft(milk_draft(), None);
        assert_eq!(fields, milk_draft());
    }

    #[test]
    fn test_merge_keeps_user_edits() {
        let mut fields = FormFields {
            name: "Oat milk".to_string(),
            ..FormFields::default()
        };
        fields.merge_draft(milk_draft(), None);
        assert_eq!(fields.name, "Oat milk");
        assert_eq!(fields.category, Category::Dairy);
        assert_eq!(fields.notes, "top shelf");
    }

    #[test]
    fn test_merge_skips_reserved_field() {
        let mut fields = FormFields::default();
        fields.merge_draft(milk_draft(), Some(FormField::ExpiryDate));
        assert_eq!(fields.expiry_date, "");
        assert_eq!(fields.name, "Milk");
    }

    #[test]
    fn test_apply_scan_targets_field() {
        let mut fields = milk_draft();
        fields.apply_scan(&ScanResult::new(ScanKind::ExpiryDate, "2026-01-15"));
        assert_eq!(fields.expiry_date, "2026-01-15");
        fields.apply_scan(&ScanResult::new(ScanKind::ProductName, "Yogurt"));
        assert_eq!(fields.name, "Yogurt");
    }

    #[test]
    fn test_scan_kind_wire_names() {
        assert_eq!(ScanKind::ProductName.as_str(), "product_name");
        assert_eq!(ScanKind::parse("expiry_date"), Some(ScanKind::ExpiryDate));
        assert_eq!(ScanKind::parse("barcode"), None);
    }

    #[test]
    fn test_draft_json_shape() {
        let json = serde_json::to_string(&milk_draft()).unwrap();
        assert!(json.contains("\"expiryDate\":\"2025-12-31\""));
        let back: FormFields = serde_json::from_str(&json).unwrap();
        assert_eq!(back, milk_draft());
    }

    #[test]
    fn test_partial_draft_json_fills_defaults() {
        let back: FormFields = serde_json::from_str(r#"{"name":"Bread"}"#).unwrap();
        assert_eq!(back.name, "Bread");
        assert_eq!(back.category, Category::Other);
        assert!(back.expiry_date.is_empty());
    }
}
