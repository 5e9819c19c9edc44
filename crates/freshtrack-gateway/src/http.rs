//! HTTP client for the remote text-extraction endpoint
//!
//! # Wire format
//!
//! Request: `POST <endpoint>` with
//! `{"imageBase64": "data:<mime>;base64,<...>", "extractType": "product_name" | "expiry_date"}`.
//!
//! Response: `{"result": "<text>"}` on success or `{"error": "<message>"}`.
//! Status 429 means throttled and 402 means the usage quota is exhausted.
//!
//! # Examples
//!
//! ```no_run
//! use freshtrack_gateway::ExtractionGateway;
//!
//! let gateway = ExtractionGateway::new("http://localhost:54321/functions/v1/extract-text")
//!     .unwrap()
//!     .with_api_key("anon-key");
//! ```

use crate::{classify, ExtractError, TextExtractor};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use freshtrack_domain::{ScanKind, StillImage};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default endpoint: a locally served extraction function
pub const DEFAULT_ENDPOINT: &str = "http://localhost:54321/functions/v1/extract-text";

/// HTTP extraction client
///
/// No timeout is applied unless one is configured; a stalled call stays
/// pending until the remote resolves or errors.
pub struct ExtractionGateway {
    endpoint: String,
    api_key: Option<String>,
    timeout: Option<Duration>,
    client: reqwest::Client,
}

/// Request body for the extraction endpoint
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExtractRequest<'a> {
    image_base64: String,
    extract_type: &'a str,
}

/// Response body from the extraction endpoint
#[derive(Deserialize, Default)]
struct ExtractResponse {
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ExtractionGateway {
    /// Create a gateway for `endpoint`
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` if the HTTP client cannot be constructed.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, ExtractError> {
        Self::build(endpoint.into(), None, None)
    }

    /// Create a gateway for the default local endpoint
    pub fn default_endpoint() -> Result<Self, ExtractError> {
        Self::new(DEFAULT_ENDPOINT)
    }

    /// Send `key` as bearer token and `apikey` header
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Bound every request by `timeout`
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` if the HTTP client cannot be rebuilt.
    pub fn with_timeout(self, timeout: Duration) -> Result<Self, ExtractError> {
        Self::build(self.endpoint, self.api_key, Some(timeout))
    }

    /// Endpoint this gateway posts to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build(
        endpoint: String,
        api_key: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, ExtractError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ExtractError::RemoteError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint,
            api_key,
            timeout,
            client,
        })
    }

    /// Extract text for `kind` from `image`
    ///
    /// # Errors
    ///
    /// - `NotFound` / `Unrecognized` when the remote answers with a sentinel
    /// - `RateLimited` on HTTP 429, `QuotaExceeded` on HTTP 402
    /// - `RemoteError` for anything else that is not a usable result
    pub async fn extract(&self, image: &StillImage, kind: ScanKind) -> Result<String, ExtractError> {
        let body = ExtractRequest {
            image_base64: to_data_url(image),
            extract_type: kind.as_str(),
        };

        info!(
            kind = kind.as_str(),
            bytes = image.len(),
            timeout = ?self.timeout,
            "Sending image for extraction"
        );

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key).header("apikey", key);
        }

        let response = request.send().await.map_err(|e| {
            warn!(error = %e, "Extraction request failed");
            ExtractError::RemoteError(format!("Request failed: {}", e))
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ExtractError::RemoteError(format!("Failed to read response: {}", e)))?;

        debug!(status = status.as_u16(), len = text.len(), "Extraction response received");

        let outcome = interpret_response(status, &text, kind);
        if let Err(e) = &outcome {
            if !e.is_recoverable() {
                warn!(error = %e, "Extraction failed");
            }
        }
        outcome
    }
}

#[async_trait]
impl TextExtractor for ExtractionGateway {
    async fn extract(&self, image: &StillImage, kind: ScanKind) -> Result<String, ExtractError> {
        ExtractionGateway::extract(self, image, kind).await
    }
}

/// Encode a still image as a `data:` URL
pub fn to_data_url(image: &StillImage) -> String {
    format!(
        "data:{};base64,{}",
        image.mime_type(),
        STANDARD.encode(image.bytes())
    )
}

/// Map a status code and body onto an extraction outcome
pub(crate) fn interpret_response(
    status: StatusCode,
    body: &str,
    kind: ScanKind,
) -> Result<String, ExtractError> {
    let parsed: Result<ExtractResponse, _> = serde_json::from_str(body);
    let remote_message = |fallback: &str| {
        parsed
            .as_ref()
            .ok()
            .and_then(|r| r.error.clone())
            .unwrap_or_else(|| fallback.to_string())
    };

    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(ExtractError::RateLimited(remote_message(
            "Rate limit exceeded. Please try again in a moment.",
        )));
    }
    if status == StatusCode::PAYMENT_REQUIRED {
        return Err(ExtractError::QuotaExceeded(remote_message(
            "AI usage limit reached. Please add credits to continue.",
        )));
    }
    if !status.is_success() {
        return Err(ExtractError::RemoteError(format!(
            "HTTP {}: {}",
            status,
            remote_message("Unknown error")
        )));
    }

    let response = parsed.map_err(|e| {
        ExtractError::RemoteError(format!("Failed to parse response: {}", e))
    })?;

    match response {
        ExtractResponse {
            error: Some(message),
            ..
        } => Err(ExtractError::RemoteError(message)),
        ExtractResponse {
            result: Some(text), ..
        } => classify(kind, &text),
        _ => Err(ExtractError::RemoteError(
            "Response carried neither result nor error".to_string(),
        )),
    }
}
