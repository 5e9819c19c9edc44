//! Add-product form controller
//!
//! Holds the in-progress fields, hands off to the scanner through a saved
//! draft, merges the draft and scan result back on return, and validates
//! and submits the finished product.

use crate::draft::DraftCoordinator;
use crate::error::{DraftError, SubmitError};
use crate::navigation::{Navigator, ScanRequest};
use chrono::NaiveDate;
use freshtrack_domain::traits::{AuthProvider, ProductStore, SessionStorage};
use freshtrack_domain::{Category, FormFields, NewProduct, Product, ScanKind, ScanResult};
use std::fmt::Display;
use tracing::{debug, info, warn};

/// Accepted expiry date format
pub const EXPIRY_FORMAT: &str = "%Y-%m-%d";

/// The add-product form
#[derive(Debug)]
pub struct ProductForm<S: SessionStorage> {
    fields: FormFields,
    drafts: DraftCoordinator<S>,
}

impl<S: SessionStorage> ProductForm<S> {
    /// An empty form
    pub fn new(drafts: DraftCoordinator<S>) -> Self {
        Self {
            fields: FormFields::default(),
            drafts,
        }
    }

    /// Mount the form, picking up any draft and scan result left behind
    pub fn mount(drafts: DraftCoordinator<S>, nav: &mut Navigator) -> (Self, Option<ScanResult>) {
        let mut form = Self::new(drafts);
        let scanned = form.resume(nav);
        (form, scanned)
    }

    /// Current field values
    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    /// Set the product name
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.fields.name = name.into();
    }

    /// Set the category
    pub fn set_category(&mut self, category: Category) {
        self.fields.category = category;
    }

    /// Set the expiry date text
    pub fn set_expiry_date(&mut self, expiry: impl Into<String>) {
        self.fields.expiry_date = expiry.into();
    }

    /// Set the notes
    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.fields.notes = notes.into();
    }

    /// Save the draft, then navigate to the scanner for `kind`
    ///
    /// Nothing navigates if the draft cannot be written.
    pub fn handle_scan(&self, kind: ScanKind, nav: &mut Navigator) -> Result<ScanRequest, DraftError> {
        self.drafts.save(&self.fields)?;
        info!(kind = %kind, "Opening scanner");
        Ok(nav.open_scanner(kind))
    }

    /// Restore the draft and apply the scan result on return from the scanner
    ///
    /// The result is drained from the navigator, so calling this again is
    /// harmless. Draft values only fill fields still at their default, the
    /// scanned field is never filled from the draft, and the scanned text is
    /// applied last. The draft is cleared afterwards.
    pub fn resume(&mut self, nav: &mut Navigator) -> Option<ScanResult> {
        let result = nav.take_result();

        if self.drafts.has_draft() {
            let draft = self.drafts.restore();
            let reserved = result.as_ref().map(|r| r.kind.field());
            let applied = self.fields.merge_draft(draft, reserved);
            self.drafts.clear();
            debug!(applied, "Draft merged");
        }

        if let Some(result) = &result {
            self.fields.apply_scan(result);
            info!(kind = %result.kind, "Scan result applied");
        }

        result
    }

    /// Validate and insert the product for the signed-in user
    ///
    /// Checks run in order and stop at the first failure: signed in, name
    /// present, expiry a calendar date. Any failure leaves the fields as they
    /// were. On success the draft is cleared, the fields reset, and the new
    /// product returned so the caller can refresh its listing.
    pub fn submit<P, A>(&mut self, store: &mut P, auth: &A) -> Result<Product, SubmitError>
    where
        P: ProductStore,
        P::Error: Display,
        A: AuthProvider,
    {
        let owner = auth.current_user().ok_or(SubmitError::Unauthenticated)?;

        let name = self.fields.name.trim();
        if name.is_empty() {
            return Err(SubmitError::MissingName);
        }

        let expiry_date = NaiveDate::parse_from_str(self.fields.expiry_date.trim(), EXPIRY_FORMAT)
            .map_err(|_| SubmitError::MissingExpiry)?;

        let notes = self.fields.notes.trim();
        let notes = (!notes.is_empty()).then(|| notes.to_string());

        let product = store
            .create(NewProduct {
                owner,
                name: name.to_string(),
                category: self.fields.category,
                expiry_date,
                notes,
            })
            .map_err(|e| {
                warn!(error = %e, "Product insert failed");
                SubmitError::Persistence(e.to_string())
            })?;

        self.drafts.clear();
        self.fields = FormFields::default();
        info!(id = %product.id, "Product added");
        Ok(product)
    }

    /// Abandon the form: drop the draft and reset the fields
    pub fn cancel(&mut self) {
        self.drafts.clear();
        self.fields = FormFields::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_DRAFT_SLOT;
    use freshtrack_domain::UserId;
    use freshtrack_store::{MemorySessionStorage, SqliteStore, StaticAuth};

    fn store() -> SqliteStore {
        SqliteStore::new(":memory:").unwrap()
    }

    #[test]
    fn test_validation_order() {
        let storage = MemorySessionStorage::new();
        let mut form = ProductForm::new(DraftCoordinator::new(&storage, DEFAULT_DRAFT_SLOT));
        let mut store = store();

        assert_eq!(
            form.submit(&mut store, &StaticAuth::signed_out()),
            Err(SubmitError::Unauthenticated)
        );

        let auth = StaticAuth::signed_in("alice");
        assert_eq!(form.submit(&mut store, &auth), Err(SubmitError::MissingName));

        form.set_name("  Milk ");
        assert_eq!(form.submit(&mut store, &auth), Err(SubmitError::MissingExpiry));

        form.set_expiry_date("31/12/2025");
        assert_eq!(form.submit(&mut store, &auth), Err(SubmitError::MissingExpiry));
        assert_eq!(form.fields().name, "  Milk ");
    }

    #[test]
    fn test_submit_normalizes_and_resets() {
        let storage = MemorySessionStorage::new();
        let drafts = DraftCoordinator::new(&storage, DEFAULT_DRAFT_SLOT);
        let mut form = ProductForm::new(drafts);
        let mut store = store();
        let auth = StaticAuth::signed_in("alice");

        form.set_name("  Greek yogurt ");
        form.set_category(Category::Dairy);
        form.set_expiry_date("2025-12-31");
        form.set_notes("   ");
        storage.set_item(DEFAULT_DRAFT_SLOT, "{}".to_string());

        let product = form.submit(&mut store, &auth).unwrap();
        assert_eq!(product.name, "Greek yogurt");
        assert_eq!(product.notes, None);
        assert_eq!(product.expiry_date, NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
        assert!(form.fields().is_empty());
        assert!(storage.is_empty());
    }

    #[test]
    fn test_submit_trims_notes() {
        let storage = MemorySessionStorage::new();
        let mut form = ProductForm::new(DraftCoordinator::new(&storage, DEFAULT_DRAFT_SLOT));
        let mut store = store();
        let auth = StaticAuth::signed_in("alice");

        form.set_name("Butter");
        form.set_expiry_date("2025-11-02");
        form.set_notes("  top shelf \n");

        let product = form.submit(&mut store, &auth).unwrap();
        assert_eq!(product.notes.as_deref(), Some("top shelf"));

        let rows = store.list(&UserId::new("alice")).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].notes.as_deref(), Some("top shelf"));
    }

    #[test]
    fn test_handle_scan_saves_before_navigating() {
        let storage = MemorySessionStorage::new();
        let mut form = ProductForm::new(DraftCoordinator::new(&storage, DEFAULT_DRAFT_SLOT));
        let mut nav = Navigator::new();
        form.set_name("Milk");

        let request = form.handle_scan(ScanKind::ExpiryDate, &mut nav).unwrap();
        assert_eq!(request.kind, ScanKind::ExpiryDate);
        assert!(storage.get_item(DEFAULT_DRAFT_SLOT).is_some());
    }

    #[test]
    fn test_resume_applies_result_once() {
        let storage = MemorySessionStorage::new();
        let mut nav = Navigator::new();
        nav.return_to_form(Some(ScanResult::new(ScanKind::ProductName, "Cheddar")));

        let (mut form, scanned) =
            ProductForm::mount(DraftCoordinator::new(&storage, DEFAULT_DRAFT_SLOT), &mut nav);
        assert_eq!(scanned.unwrap().text, "Cheddar");
        assert_eq!(form.fields().name, "Cheddar");

        form.set_name("Cheddar cheese");
        assert!(form.resume(&mut nav).is_none());
        assert_eq!(form.fields().name, "Cheddar cheese");
    }

    #[test]
    fn test_cancel_clears_draft() {
        let storage = MemorySessionStorage::new();
        let mut form = ProductForm::new(DraftCoordinator::new(&storage, DEFAULT_DRAFT_SLOT));
        let mut nav = Navigator::new();
        form.set_notes("opened");
        form.handle_scan(ScanKind::ProductName, &mut nav).unwrap();

        form.cancel();
        assert!(storage.is_empty());
        assert!(form.fields().is_empty());
    }
}
