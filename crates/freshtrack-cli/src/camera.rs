//! Camera that reads its single frame from an image file.
//!
//! Terminals have no video device, so a photo on disk stands in for the
//! live feed. Acquisition checks the file is there and readable; the
//! snapshot reads its bytes.

use async_trait::async_trait;
use freshtrack_domain::StillImage;
use freshtrack_scan::{CameraDevice, CameraError, CaptureConstraints, VideoFeed};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A camera backed by an image file.
#[derive(Debug, Clone)]
pub struct FileCamera {
    path: PathBuf,
}

impl FileCamera {
    /// Use the image at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Image file in use.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CameraDevice for FileCamera {
    type Feed = FileFeed;

    async fn acquire(&mut self, constraints: &CaptureConstraints) -> Result<FileFeed, CameraError> {
        debug!(path = %self.path.display(), ?constraints, "Opening image file");
        let metadata = tokio::fs::metadata(&self.path).await.map_err(io_to_camera)?;
        if !metadata.is_file() {
            return Err(CameraError::DeviceUnavailable);
        }

        Ok(FileFeed {
            path: self.path.clone(),
            released: false,
        })
    }
}

/// Live "feed" over an image file.
#[derive(Debug)]
pub struct FileFeed {
    path: PathBuf,
    released: bool,
}

impl VideoFeed for FileFeed {
    fn resolution(&self) -> Option<(u32, u32)> {
        None
    }

    fn snapshot(&mut self) -> Result<StillImage, CameraError> {
        if self.released {
            return Err(CameraError::Capture("feed already released".to_string()));
        }
        let bytes = std::fs::read(&self.path).map_err(|e| CameraError::Capture(e.to_string()))?;
        Ok(StillImage::new(bytes, mime_for(&self.path)))
    }

    fn release(&mut self) {
        self.released = true;
    }
}

fn io_to_camera(e: std::io::Error) -> CameraError {
    match e.kind() {
        ErrorKind::NotFound => CameraError::DeviceUnavailable,
        ErrorKind::PermissionDenied => CameraError::PermissionDenied,
        _ => CameraError::Capture(e.to_string()),
    }
}

/// MIME type from the file extension; JPEG when unknown.
pub fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("heic") => "image/heic",
        _ => "image/jpeg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use freshtrack_scan::{CameraController, CameraState};
    use tempfile::TempDir;

    #[test]
    fn test_mime_for() {
        assert_eq!(mime_for(Path::new("label.PNG")), "image/png");
        assert_eq!(mime_for(Path::new("label.jpg")), "image/jpeg");
        assert_eq!(mime_for(Path::new("label")), "image/jpeg");
    }

    #[tokio::test]
    async fn test_missing_file_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let mut ctl = CameraController::new(
            FileCamera::new(dir.path().join("nope.jpg")),
            CaptureConstraints::preferred(),
        );

        assert_eq!(ctl.start().await, Err(CameraError::DeviceUnavailable));
        assert_eq!(ctl.state(), CameraState::DeviceError);
    }

    #[tokio::test]
    async fn test_capture_reads_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("label.png");
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

        let mut ctl = CameraController::new(FileCamera::new(&path), CaptureConstraints::preferred());
        ctl.start().await.unwrap();
        let image = ctl.capture().unwrap().cloned().unwrap();

        assert_eq!(image.mime_type(), "image/png");
        assert_eq!(image.len(), 4);
        assert!(!ctl.is_live());
    }
}
