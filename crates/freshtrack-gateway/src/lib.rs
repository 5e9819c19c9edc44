//! FreshTrack Extraction Gateway
//!
//! Sends a captured still image to the remote text-extraction endpoint and
//! normalizes what comes back.
//!
//! # Outcomes
//!
//! - accepted text (an ISO date string for expiry scans)
//! - recoverable "nothing found" results: [`ExtractError::NotFound`] and
//!   [`ExtractError::Unrecognized`], raised when the remote answers with a
//!   sentinel instead of a value
//! - transport failures: [`ExtractError::RateLimited`],
//!   [`ExtractError::QuotaExceeded`], [`ExtractError::RemoteError`]
//!
//! No retries happen here; the caller decides whether to let the user retake.
//!
//! # Providers
//!
//! - `MockExtractor`: Deterministic mock for testing
//! - `ExtractionGateway`: HTTP client for the extraction endpoint
//!
//! # Examples
//!
//! ```
//! use freshtrack_domain::{ScanKind, StillImage};
//! use freshtrack_gateway::{MockExtractor, TextExtractor};
//!
//! # async fn example() {
//! let extractor = MockExtractor::new("2025-12-31");
//! let image = StillImage::new(vec![0xff, 0xd8], "image/jpeg");
//! let text = extractor.extract(&image, ScanKind::ExpiryDate).await.unwrap();
//! assert_eq!(text, "2025-12-31");
//! # }
//! ```

#![warn(missing_docs)]

pub mod http;

use async_trait::async_trait;
use freshtrack_domain::{ScanKind, StillImage};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use http::ExtractionGateway;

/// Reply meaning "no expiry date visible"
pub const NOT_FOUND_SENTINEL: &str = "NOT_FOUND";

/// Reply meaning "no product name visible"
pub const UNKNOWN_PRODUCT_SENTINEL: &str = "Unknown Product";

/// Errors that can occur during extraction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// Expiry scan came back with the "not found" sentinel
    #[error("No expiry date found")]
    NotFound,

    /// Product-name scan came back with the "unknown product" sentinel
    #[error("Product not recognized")]
    Unrecognized,

    /// Remote is throttling; the user should retry later
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Remote usage limit exhausted; nothing works until someone tops it up
    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Any other failure: transport, non-2xx status, malformed payload
    #[error("Remote error: {0}")]
    RemoteError(String),
}

impl ExtractError {
    /// True for the "nothing found" outcomes that call for a retake rather
    /// than an error banner
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ExtractError::NotFound | ExtractError::Unrecognized)
    }
}

/// Trait for image-to-text extraction
///
/// Implemented by the HTTP gateway and by the mock.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Extract the text for `kind` from `image`
    async fn extract(&self, image: &StillImage, kind: ScanKind) -> Result<String, ExtractError>;
}

/// Classify the raw text returned by the extractor
///
/// The text is trimmed first. A sentinel matching the requested kind becomes
/// the recoverable error for that kind. An empty reply is treated the same
/// way even though it is not a sentinel. Anything else is accepted as is.
/// Expiry text is not re-validated here.
pub fn classify(kind: ScanKind, raw: &str) -> Result<String, ExtractError> {
    let text = raw.trim();
    match kind {
        ScanKind::ExpiryDate if text.is_empty() || text == NOT_FOUND_SENTINEL => {
            Err(ExtractError::NotFound)
        }
        ScanKind::ProductName if text.is_empty() || text == UNKNOWN_PRODUCT_SENTINEL => {
            Err(ExtractError::Unrecognized)
        }
        _ => Ok(text.to_string()),
    }
}

/// Mock extractor for deterministic testing
///
/// Scripted outcomes are consumed first-in first-out; once the script is
/// empty every call returns the default text. Text outcomes pass through
/// [`classify`], so scripting a sentinel behaves like the real gateway.
///
/// # Examples
///
/// ```
/// use freshtrack_domain::{ScanKind, StillImage};
/// use freshtrack_gateway::{ExtractError, MockExtractor, TextExtractor};
///
/// # async fn example() {
/// let extractor = MockExtractor::new("Milk");
/// extractor.push_text("NOT_FOUND");
///
/// let image = StillImage::new(vec![1, 2, 3], "image/png");
/// let first = extractor.extract(&image, ScanKind::ExpiryDate).await;
/// assert_eq!(first, Err(ExtractError::NotFound));
/// assert_eq!(extractor.call_count(), 1);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MockExtractor {
    default_text: String,
    script: Arc<Mutex<VecDeque<Result<String, ExtractError>>>>,
    calls: Arc<Mutex<Vec<ScanKind>>>,
}

impl MockExtractor {
    /// Create a mock answering `text` to every call
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            default_text: text.into(),
            script: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a raw text reply for the next call
    pub fn push_text(&self, text: impl Into<String>) {
        self.lock_script().push_back(Ok(text.into()));
    }

    /// Queue a failure for the next call
    pub fn push_error(&self, error: ExtractError) {
        self.lock_script().push_back(Err(error));
    }

    /// Number of extract calls so far
    pub fn call_count(&self) -> usize {
        self.lock_calls().len()
    }

    /// Kinds requested so far, in call order
    pub fn requested_kinds(&self) -> Vec<ScanKind> {
        self.lock_calls().clone()
    }

    fn lock_script(&self) -> std::sync::MutexGuard<'_, VecDeque<Result<String, ExtractError>>> {
        self.script.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn lock_calls(&self) -> std::sync::MutexGuard<'_, Vec<ScanKind>> {
        self.calls.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl Default for MockExtractor {
    fn default() -> Self {
        Self::new("Default mock text")
    }
}

#[async_trait]
impl TextExtractor for MockExtractor {
    async fn extract(&self, _image: &StillImage, kind: ScanKind) -> Result<String, ExtractError> {
        self.lock_calls().push(kind);

        let next = self
            .lock_script()
            .pop_front()
            .unwrap_or_else(|| Ok(self.default_text.clone()));

        classify(kind, &next?)
    }
}
