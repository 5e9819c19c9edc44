//! Draft persistence across the scanner round trip
//!
//! The form is torn down while the scanner is open. Before leaving, the form
//! writes its fields into a single session slot; on return it reads them
//! back. Only one draft exists per session.

use crate::error::DraftError;
use freshtrack_domain::traits::SessionStorage;
use freshtrack_domain::FormFields;
use tracing::{debug, warn};

/// Reads and writes the add-product draft in session storage
#[derive(Debug, Clone)]
pub struct DraftCoordinator<S: SessionStorage> {
    storage: S,
    slot: String,
}

impl<S: SessionStorage> DraftCoordinator<S> {
    /// Use `slot` as the storage key
    pub fn new(storage: S, slot: impl Into<String>) -> Self {
        Self {
            storage,
            slot: slot.into(),
        }
    }

    /// Storage key in use
    pub fn slot(&self) -> &str {
        &self.slot
    }

    /// Overwrite the draft with `fields`
    pub fn save(&self, fields: &FormFields) -> Result<(), DraftError> {
        let json = serde_json::to_string(fields)?;
        self.storage.set_item(&self.slot, json);
        debug!(slot = %self.slot, "Draft saved");
        Ok(())
    }

    /// Read the draft back
    ///
    /// A missing slot yields empty fields. So does an unreadable one: a
    /// corrupt draft is dropped rather than blocking the form.
    pub fn restore(&self) -> FormFields {
        let Some(json) = self.storage.get_item(&self.slot) else {
            return FormFields::default();
        };

        match serde_json::from_str(&json) {
            Ok(fields) => {
                debug!(slot = %self.slot, "Draft restored");
                fields
            }
            Err(e) => {
                warn!(slot = %self.slot, error = %e, "Discarding unreadable draft");
                FormFields::default()
            }
        }
    }

    /// Remove the draft
    pub fn clear(&self) {
        self.storage.remove_item(&self.slot);
    }

    /// True when a draft is stored
    pub fn has_draft(&self) -> bool {
        self.storage.get_item(&self.slot).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_DRAFT_SLOT;
    use freshtrack_domain::Category;
    use freshtrack_store::MemorySessionStorage;

    #[test]
    fn test_save_and_restore() {
        let storage = MemorySessionStorage::new();
        let drafts = DraftCoordinator::new(&storage, DEFAULT_DRAFT_SLOT);
        let fields = FormFields {
            name: "Milk".to_string(),
            category: Category::Dairy,
            expiry_date: String::new(),
            notes: "2L".to_string(),
        };

        drafts.save(&fields).unwrap();
        assert!(drafts.has_draft());
        assert_eq!(drafts.restore(), fields);
    }

    #[test]
    fn test_missing_draft_is_empty() {
        let storage = MemorySessionStorage::new();
        let drafts = DraftCoordinator::new(&storage, DEFAULT_DRAFT_SLOT);
        assert!(!drafts.has_draft());
        assert!(drafts.restore().is_empty());
    }

    #[test]
    fn test_corrupt_draft_is_discarded() {
        let storage = MemorySessionStorage::new();
        storage.set_item(DEFAULT_DRAFT_SLOT, "{not json".to_string());
        let drafts = DraftCoordinator::new(&storage, DEFAULT_DRAFT_SLOT);
        assert!(drafts.restore().is_empty());
    }

    #[test]
    fn test_clear() {
        let storage = MemorySessionStorage::new();
        let drafts = DraftCoordinator::new(&storage, DEFAULT_DRAFT_SLOT);
        drafts.save(&FormFields::default()).unwrap();
        drafts.clear();
        assert!(!drafts.has_draft());
        assert!(storage.is_empty());
    }

    #[test]
    fn test_save_overwrites_previous_draft() {
        let storage = MemorySessionStorage::new();
        let drafts = DraftCoordinator::new(&storage, DEFAULT_DRAFT_SLOT);
        let mut fields = FormFields {
            name: "Bread".to_string(),
            ..FormFields::default()
        };
        drafts.save(&fields).unwrap();
        fields.name = "Butter".to_string();
        drafts.save(&fields).unwrap();

        assert_eq!(storage.len(), 1);
        assert_eq!(drafts.restore().name, "Butter");
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_restore_returns_saved_fields(
                name in ".{0,40}",
                category in 0usize..Category::ALL.len(),
                expiry_date in "([0-9]{4}-[0-9]{2}-[0-9]{2})?",
                notes in ".{0,80}",
            ) {
                let storage = MemorySessionStorage::new();
                let drafts = DraftCoordinator::new(&storage, DEFAULT_DRAFT_SLOT);
                let fields = FormFields {
                    name,
                    category: Category::ALL[category],
                    expiry_date,
                    notes,
                };
                drafts.save(&fields).unwrap();
                prop_assert_eq!(drafts.restore(), fields);
            }
        }
    }
}
