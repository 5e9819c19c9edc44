//! Still image captured from a camera feed

/// An encoded still frame
///
/// The bytes are already encoded (JPEG, PNG, ...); nothing in the domain
/// decodes them. Dimensions are best-effort and absent when the source
/// could not report them.
#[derive(Clone, PartialEq, Eq)]
pub struct StillImage {
    bytes: Vec<u8>,
    mime_type: String,
    dimensions: Option<(u32, u32)>,
}

impl StillImage {
    /// Wrap encoded image bytes
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
            dimensions: None,
        }
    }

    /// Attach the frame size reported by the device
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.dimensions = Some((width, height));
        self
    }

    /// Encoded bytes
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// MIME type of the encoding, e.g. `image/jpeg`
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Width and height in pixels, when known
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.dimensions
    }

    /// Size of the encoded payload
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True for a zero-byte payload
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

// Frames are large; keep them out of debug logs.
impl std::fmt::Debug for StillImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StillImage")
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .field("dimensions", &self.dimensions)
            .finish()
    }
}
