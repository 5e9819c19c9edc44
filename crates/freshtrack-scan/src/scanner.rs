//! Full-screen scanner view
//!
//! Mounted for one [`ScanKind`]: drives the camera, sends the captured still
//! to the extractor, and hands the accepted text back to the form through
//! the [`Navigator`]. The camera is released on every way out.

use crate::camera::{CameraController, CameraDevice, CameraState};
use crate::error::ScanError;
use crate::navigation::Navigator;
use freshtrack_domain::{ScanKind, ScanResult, StillImage};
use freshtrack_gateway::TextExtractor;
use tracing::{debug, info, warn};

/// The scanner view for one field
pub struct Scanner<'a, D: CameraDevice, X: TextExtractor + ?Sized> {
    kind: ScanKind,
    camera: CameraController<D>,
    extractor: &'a X,
}

impl<'a, D: CameraDevice, X: TextExtractor + ?Sized> Scanner<'a, D, X> {
    /// Build the view; the camera stays idle until [`Scanner::mount`]
    pub fn new(kind: ScanKind, camera: CameraController<D>, extractor: &'a X) -> Self {
        Self {
            kind,
            camera,
            extractor,
        }
    }

    /// Field being scanned
    pub fn kind(&self) -> ScanKind {
        self.kind
    }

    /// Camera state, for rendering
    pub fn camera_state(&self) -> CameraState {
        self.camera.state()
    }

    /// The captured photo, if any
    pub fn still(&self) -> Option<&StillImage> {
        self.camera.still()
    }

    /// Opening the scanner is the user's request for the camera, so mounting
    /// starts it
    pub async fn mount(&mut self) -> Result<(), ScanError> {
        debug!(kind = %self.kind, "Scanner mounted");
        self.start().await
    }

    /// Start (or retry starting) the camera
    pub async fn start(&mut self) -> Result<(), ScanError> {
        self.camera.start().await.map_err(ScanError::from)
    }

    /// Take the photo; returns `false` when no feed was live
    pub fn capture(&mut self) -> Result<bool, ScanError> {
        Ok(self.camera.capture()?.is_some())
    }

    /// Throw the photo away and go live again
    pub async fn retake(&mut self) -> Result<(), ScanError> {
        self.camera.retake().await.map_err(ScanError::from)
    }

    /// Send the photo for extraction
    ///
    /// On success the camera is closed and the result is ready to hand back.
    /// A sentinel reply discards the photo and leaves the camera idle for an
    /// explicit retake. Transport failures keep the photo so the user can try
    /// again without reshooting.
    pub async fn use_photo(&mut self) -> Result<ScanResult, ScanError> {
        let Some(image) = self.camera.still() else {
            return Err(ScanError::NoPhoto);
        };

        info!(kind = %self.kind, bytes = image.len(), "Extracting text");
        let outcome = self.extractor.extract(image, self.kind).await;

        match outcome {
            Ok(text) => {
                info!(kind = %self.kind, "Extraction succeeded");
                self.camera.close();
                Ok(ScanResult::new(self.kind, text))
            }
            Err(e) if e.is_recoverable() => {
                warn!(kind = %self.kind, error = %e, "Nothing found, awaiting retake");
                self.camera.discard();
                Err(e.into())
            }
            Err(e) => {
                warn!(kind = %self.kind, error = %e, "Extraction failed");
                Err(e.into())
            }
        }
    }

    /// Release the camera without leaving the view
    pub fn close(&mut self) {
        self.camera.close();
    }

    /// Leave the view, handing `result` (if any) back to the form
    ///
    /// Closing without a result is the "back" action: nothing is carried and
    /// the form's draft is restored as it was.
    pub fn finish(mut self, nav: &mut Navigator, result: Option<ScanResult>) {
        self.camera.close();
        nav.return_to_form(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{CameraError, CaptureConstraints, MockCamera};
    use freshtrack_gateway::{ExtractError, MockExtractor};

    fn scanner<'a>(
        kind: ScanKind,
        camera: &MockCamera,
        extractor: &'a MockExtractor,
    ) -> Scanner<'a, MockCamera, MockExtractor> {
        let controller = CameraController::new(camera.clone(), CaptureConstraints::preferred());
        Scanner::new(kind, controller, extractor)
    }

    #[tokio::test]
    async fn test_use_photo_success_closes_camera() {
        let camera = MockCamera::new();
        let extractor = MockExtractor::new("2025-12-31");
        let mut view = scanner(ScanKind::ExpiryDate, &camera, &extractor);

        view.mount().await.unwrap();
        assert!(view.capture().unwrap());
        let result = view.use_photo().await.unwrap();

        assert_eq!(result, ScanResult::new(ScanKind::ExpiryDate, "2025-12-31"));
        assert_eq!(view.camera_state(), CameraState::Idle);
        assert!(view.still().is_none());
        assert_eq!(camera.live_feeds(), 0);
    }

    #[tokio::test]
    async fn test_use_photo_without_capture() {
        let camera = MockCamera::new();
        let extractor = MockExtractor::default();
        let mut view = scanner(ScanKind::ProductName, &camera, &extractor);

        view.mount().await.unwrap();
        assert_eq!(view.use_photo().await, Err(ScanError::NoPhoto));
        assert_eq!(extractor.call_count(), 0);
    }

    #[tokio::test]
    async fn test_sentinel_discards_photo() {
        let camera = MockCamera::new();
        let extractor = MockExtractor::default();
        extractor.push_text("Unknown Product");
        let mut view = scanner(ScanKind::ProductName, &camera, &extractor);

        view.mount().await.unwrap();
        view.capture().unwrap();
        let err = view.use_photo().await.unwrap_err();

        assert!(err.is_recoverable());
        assert_eq!(view.camera_state(), CameraState::Idle);
        assert!(view.still().is_none());
        // No silent restart
        assert_eq!(camera.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_transport_error_keeps_photo() {
        let camera = MockCamera::new();
        let extractor = MockExtractor::new("Oat milk");
        extractor.push_error(ExtractError::RateLimited("Slow down".into()));
        let mut view = scanner(ScanKind::ProductName, &camera, &extractor);

        view.mount().await.unwrap();
        view.capture().unwrap();
        let err = view.use_photo().await.unwrap_err();
        assert_eq!(err.user_message(), "Slow down");
        assert_eq!(view.camera_state(), CameraState::Captured);

        let result = view.use_photo().await.unwrap();
        assert_eq!(result.text, "Oat milk");
        assert_eq!(extractor.call_count(), 2);
    }

    #[tokio::test]
    async fn test_mount_failure_reports_camera_error() {
        let camera = MockCamera::new();
        camera.fail_next(CameraError::DeviceUnavailable);
        let extractor = MockExtractor::default();
        let mut view = scanner(ScanKind::ExpiryDate, &camera, &extractor);

        let err = view.mount().await.unwrap_err();
        assert_eq!(err.user_message(), "No camera found on this device.");
        assert_eq!(view.camera_state(), CameraState::DeviceError);
    }

    #[tokio::test]
    async fn test_finish_releases_and_hands_back() {
        let camera = MockCamera::new();
        let extractor = MockExtractor::default();
        let mut nav = Navigator::new();
        nav.open_scanner(ScanKind::ExpiryDate);
        let mut view = scanner(ScanKind::ExpiryDate, &camera, &extractor);

        view.mount().await.unwrap();
        assert_eq!(camera.live_feeds(), 1);
        view.finish(&mut nav, None);

        assert_eq!(camera.live_feeds(), 0);
        assert!(nav.take_result().is_none());
    }
}
