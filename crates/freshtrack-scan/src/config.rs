//! Configuration for the scan flow

use crate::camera::CaptureConstraints;
use serde::{Deserialize, Serialize};

/// Session storage key of the add-product draft
pub const DEFAULT_DRAFT_SLOT: &str = "freshtrack:add-product-draft";

/// Configuration for scanning and draft handling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Session storage key holding the single draft
    #[serde(default = "default_draft_slot")]
    pub draft_slot: String,

    /// Preferred capture width (best effort)
    #[serde(default = "default_width")]
    pub target_width: u32,

    /// Preferred capture height (best effort)
    #[serde(default = "default_height")]
    pub target_height: u32,

    /// Ask for the rear-facing sensor first
    #[serde(default = "default_true")]
    pub prefer_rear_camera: bool,
}

fn default_draft_slot() -> String {
    DEFAULT_DRAFT_SLOT.to_string()
}

fn default_width() -> u32 {
    1280
}

fn default_height() -> u32 {
    720
}

fn default_true() -> bool {
    true
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            draft_slot: default_draft_slot(),
            target_width: default_width(),
            target_height: default_height(),
            prefer_rear_camera: true,
        }
    }
}

impl ScanConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.draft_slot.trim().is_empty() {
            return Err("draft_slot must not be empty".to_string());
        }
        if self.target_width == 0 || self.target_height == 0 {
            return Err("target resolution must be non-zero".to_string());
        }
        Ok(())
    }

    /// Constraints for the first acquisition attempt
    pub fn preferred_constraints(&self) -> CaptureConstraints {
        CaptureConstraints {
            prefer_rear: self.prefer_rear_camera,
            resolution: Some((self.target_width, self.target_height)),
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
