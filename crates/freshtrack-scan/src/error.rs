//! Error types for the scan-and-draft flow

use crate::camera::CameraError;
use freshtrack_domain::ScanKind;
use freshtrack_gateway::ExtractError;
use thiserror::Error;

/// Errors surfaced by the scanner view
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// Camera could not be started or read
    #[error("Camera error: {0}")]
    Camera(#[from] CameraError),

    /// Extraction failed or found nothing
    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    /// "Use photo" with no captured photo
    #[error("No photo captured")]
    NoPhoto,
}

impl ScanError {
    /// True when the user should simply retake the photo
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ScanError::Extract(e) if e.is_recoverable())
    }

    /// Text for the transient notification shown to the user
    pub fn user_message(&self) -> String {
        match self {
            ScanError::Camera(e) => e.user_message().to_string(),
            ScanError::Extract(ExtractError::NotFound) => {
                "Could not find an expiry date. Please try again.".to_string()
            }
            ScanError::Extract(ExtractError::Unrecognized) => {
                "Could not identify the product. Please try again.".to_string()
            }
            ScanError::Extract(ExtractError::RateLimited(msg))
            | ScanError::Extract(ExtractError::QuotaExceeded(msg)) => msg.clone(),
            ScanError::Extract(ExtractError::RemoteError(_)) => {
                "Failed to process image. Please try again.".to_string()
            }
            ScanError::NoPhoto => "Capture a photo first.".to_string(),
        }
    }
}

/// Success notice for a scan
pub fn detected_message(kind: ScanKind) -> String {
    format!("{} detected!", kind.label())
}

/// Validation and persistence failures on submit
///
/// None of these clear the form; the user corrects and resubmits.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// Nobody is signed in
    #[error("You must be logged in to add products")]
    Unauthenticated,

    /// Name is empty after trimming
    #[error("Please enter a product name")]
    MissingName,

    /// Expiry date is empty or not a calendar date
    #[error("Please enter an expiry date")]
    MissingExpiry,

    /// The record store rejected the write
    #[error("Failed to add product: {0}")]
    Persistence(String),
}

/// Draft snapshot could not be written
#[derive(Error, Debug)]
pub enum DraftError {
    /// Serializing the form fields failed
    #[error("Failed to serialize draft: {0}")]
    Serialize(#[from] serde_json::Error),
}
