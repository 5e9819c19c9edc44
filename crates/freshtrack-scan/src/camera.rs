//! Camera Capture Controller
//!
//! Owns the video device for the scanner view: acquires it, snapshots one
//! still frame, and releases it on every exit path.
//!
//! # States
//!
//! ```text
//! Idle ──start──▶ Requesting ──ok──▶ Active ──capture──▶ Captured
//!                     │                                   │
//!                     ├─denied──▶ PermissionError         ├─retake──▶ Requesting
//!                     └─other───▶ DeviceError             └─discard─▶ Idle
//! ```
//!
//! Error states only leave through an explicit `start`. The single automatic
//! retry is the constraint fallback: when the preferred constraints are
//! unsupported or cannot be satisfied, acquisition is retried once with no
//! constraints at all.

use async_trait::async_trait;
use freshtrack_domain::StillImage;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors reported by a camera device
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CameraError {
    /// The user or platform refused access
    #[error("Camera permission denied")]
    PermissionDenied,

    /// No camera present
    #[error("No camera available")]
    DeviceUnavailable,

    /// Camera already claimed by another consumer
    #[error("Camera is busy")]
    DeviceBusy,

    /// Capture API absent
    #[error("Camera capture is not supported")]
    Unsupported,

    /// The requested constraints cannot be met by any device
    #[error("Camera constraints cannot be satisfied: {0}")]
    OverConstrained(String),

    /// Reading a frame from a live feed failed
    #[error("Failed to capture frame: {0}")]
    Capture(String),
}

impl CameraError {
    /// Whether acquisition should be retried with minimal constraints
    pub fn wants_fallback(&self) -> bool {
        matches!(self, CameraError::Unsupported | CameraError::OverConstrained(_))
    }

    /// Text for the transient notification shown to the user
    pub fn user_message(&self) -> &'static str {
        match self {
            CameraError::PermissionDenied => {
                "Camera access denied. Please allow camera permissions in your settings."
            }
            CameraError::DeviceUnavailable => "No camera found on this device.",
            CameraError::DeviceBusy => "Camera is in use by another application.",
            _ => "Could not access camera. Please check permissions.",
        }
    }
}

/// What to ask the device for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureConstraints {
    /// Prefer the rear-facing sensor
    pub prefer_rear: bool,

    /// Target resolution; the device may deliver something else
    pub resolution: Option<(u32, u32)>,
}

impl CaptureConstraints {
    /// Rear camera at 1280x720
    pub fn preferred() -> Self {
        Self {
            prefer_rear: true,
            resolution: Some((1280, 720)),
        }
    }

    /// Any camera, any size
    pub fn minimal() -> Self {
        Self {
            prefer_rear: false,
            resolution: None,
        }
    }
}

impl Default for CaptureConstraints {
    fn default() -> Self {
        Self::preferred()
    }
}

/// A video input device that can be claimed exclusively
#[async_trait]
pub trait CameraDevice: Send {
    /// Live feed handed out on successful acquisition
    type Feed: VideoFeed;

    /// Claim the device
    async fn acquire(&mut self, constraints: &CaptureConstraints) -> Result<Self::Feed, CameraError>;
}

/// A claimed, live video feed
pub trait VideoFeed: Send {
    /// Size the device actually delivers, when known
    fn resolution(&self) -> Option<(u32, u32)>;

    /// Encode the current frame
    fn snapshot(&mut self) -> Result<StillImage, CameraError>;

    /// Give the device back; must be safe to call more than once
    fn release(&mut self);
}

/// Lifecycle state of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraState {
    /// No device, no photo; waiting for the user
    Idle,
    /// Acquisition in flight
    Requesting,
    /// Live feed running
    Active,
    /// Photo held, device released
    Captured,
    /// Access refused; needs an explicit retry
    PermissionError,
    /// Any other device failure; needs an explicit retry
    DeviceError,
}

/// Sole owner of the camera device and of the current still frame
pub struct CameraController<D: CameraDevice> {
    device: D,
    constraints: CaptureConstraints,
    feed: Option<D::Feed>,
    still: Option<StillImage>,
    state: CameraState,
    last_error: Option<CameraError>,
}

impl<D: CameraDevice> CameraController<D> {
    /// Create an idle controller over `device`
    pub fn new(device: D, constraints: CaptureConstraints) -> Self {
        Self {
            device,
            constraints,
            feed: None,
            still: None,
            state: CameraState::Idle,
            last_error: None,
        }
    }

    /// Current state
    pub fn state(&self) -> CameraState {
        self.state
    }

    /// The captured photo, if any
    pub fn still(&self) -> Option<&StillImage> {
        self.still.as_ref()
    }

    /// Error that put the controller in an error state
    pub fn last_error(&self) -> Option<&CameraError> {
        self.last_error.as_ref()
    }

    /// True while a device handle is held
    pub fn is_live(&self) -> bool {
        self.feed.is_some()
    }

    /// Acquire the device and start the live feed
    ///
    /// A no-op while already active. Any held photo is discarded first.
    ///
    /// # Errors
    ///
    /// The device error, after the one-shot minimal-constraint fallback for
    /// unsupported or over-constrained requests.
    pub async fn start(&mut self) -> Result<(), CameraError> {
        if self.state == CameraState::Active && self.feed.is_some() {
            return Ok(());
        }

        self.still = None;
        self.last_error = None;
        self.state = CameraState::Requesting;
        debug!(constraints = ?self.constraints, "Requesting camera");

        let attempt = match self.device.acquire(&self.constraints).await {
            Err(e) if e.wants_fallback() => {
                warn!(error = %e, "Preferred camera constraints failed, retrying with minimal constraints");
                self.device.acquire(&CaptureConstraints::minimal()).await
            }
            other => other,
        };

        match attempt {
            Ok(feed) => {
                info!(resolution = ?feed.resolution(), "Camera active");
                self.feed = Some(feed);
                self.state = CameraState::Active;
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Snapshot the live frame and release the device
    ///
    /// Returns `Ok(None)` without touching anything when no feed is live.
    pub fn capture(&mut self) -> Result<Option<&StillImage>, CameraError> {
        let Some(mut feed) = self.feed.take() else {
            debug!(state = ?self.state, "Capture ignored: no live feed");
            return Ok(None);
        };

        let snapshot = feed.snapshot();
        let resolution = feed.resolution();
        feed.release();

        match snapshot {
            Ok(mut image) => {
                if image.dimensions().is_none() {
                    if let Some((w, h)) = resolution {
                        image = image.with_dimensions(w, h);
                    }
                }
                info!(bytes = image.len(), "Frame captured, camera released");
                self.still = Some(image);
                self.state = CameraState::Captured;
                Ok(self.still.as_ref())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Throw away the photo and go live again
    ///
    /// Only a held photo is retaken. Without one there is no device to
    /// resume, so the controller settles in `Idle` and waits for the user to
    /// start the camera explicitly. While live this is a no-op.
    pub async fn retake(&mut self) -> Result<(), CameraError> {
        match self.state {
            CameraState::Active => Ok(()),
            CameraState::Captured => {
                self.still = None;
                self.start().await
            }
            _ => {
                self.discard();
                Ok(())
            }
        }
    }

    /// Drop the photo and any device, and wait for the user
    pub fn discard(&mut self) {
        self.release_feed();
        self.still = None;
        self.last_error = None;
        self.state = CameraState::Idle;
    }

    /// Release the device if held; idempotent
    ///
    /// A held photo survives; an interrupted acquisition is reset to `Idle`.
    pub fn stop(&mut self) {
        self.release_feed();
        if matches!(self.state, CameraState::Active | CameraState::Requesting) {
            self.state = CameraState::Idle;
        }
    }

    /// Leave the scanner: release everything
    pub fn close(&mut self) {
        self.discard();
    }

    fn release_feed(&mut self) {
        if let Some(mut feed) = self.feed.take() {
            feed.release();
            info!("Camera released");
        }
    }

    fn fail(&mut self, error: CameraError) -> CameraError {
        self.release_feed();
        self.state = match error {
            CameraError::PermissionDenied => CameraState::PermissionError,
            _ => CameraState::DeviceError,
        };
        warn!(error = %error, state = ?self.state, "Camera failure");
        self.last_error = Some(error.clone());
        error
    }
}

impl<D: CameraDevice> Drop for CameraController<D> {
    fn drop(&mut self) {
        self.release_feed();
    }
}

/// Shared bookkeeping behind [`MockCamera`]
#[derive(Debug, Default)]
struct MockCameraInner {
    script: Vec<Result<(u32, u32), CameraError>>,
    requests: Vec<CaptureConstraints>,
    live_feeds: usize,
    frame_error: Option<CameraError>,
}

/// Deterministic camera for tests
///
/// Acquisition outcomes are scripted first-in first-out; an empty script
/// grants a 1280x720 feed. Clones share state, so a test can keep a handle
/// after moving the camera into a controller.
#[derive(Debug, Clone, Default)]
pub struct MockCamera {
    inner: Arc<Mutex<MockCameraInner>>,
}

impl MockCamera {
    /// A camera that always grants access
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the next acquisition to fail with `error`
    pub fn fail_next(&self, error: CameraError) -> &Self {
        self.lock().script.push(Err(error));
        self
    }

    /// Script the next acquisition to succeed at `width`x`height`
    pub fn grant_next(&self, width: u32, height: u32) -> &Self {
        self.lock().script.push(Ok((width, height)));
        self
    }

    /// Make every snapshot fail with `error`
    pub fn fail_frames(&self, error: CameraError) {
        self.lock().frame_error = Some(error);
    }

    /// Constraints of every acquisition attempt, in order
    pub fn requests(&self) -> Vec<CaptureConstraints> {
        self.lock().requests.clone()
    }

    /// Feeds handed out and not yet released
    pub fn live_feeds(&self) -> usize {
        self.lock().live_feeds
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockCameraInner> {
        self.inner.lock().unwrap_or_else(|p| p.into_inner())
    }
}

#[async_trait]
impl CameraDevice for MockCamera {
    type Feed = MockFeed;

    async fn acquire(&mut self, constraints: &CaptureConstraints) -> Result<MockFeed, CameraError> {
        let mut inner = self.lock();
        inner.requests.push(*constraints);

        let outcome = if inner.script.is_empty() {
            Ok((1280, 720))
        } else {
            inner.script.remove(0)
        };

        let (width, height) = outcome?;
        inner.live_feeds += 1;
        Ok(MockFeed {
            inner: Arc::clone(&self.inner),
            resolution: (width, height),
            released: false,
        })
    }
}

/// Feed handed out by [`MockCamera`]
#[derive(Debug)]
pub struct MockFeed {
    inner: Arc<Mutex<MockCameraInner>>,
    resolution: (u32, u32),
    released: bool,
}

impl VideoFeed for MockFeed {
    fn resolution(&self) -> Option<(u32, u32)> {
        Some(self.resolution)
    }

    fn snapshot(&mut self) -> Result<StillImage, CameraError> {
        let inner = self.inner.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(error) = &inner.frame_error {
            return Err(error.clone());
        }
        // Minimal JPEG start/end markers
        Ok(StillImage::new(vec![0xff, 0xd8, 0xff, 0xd9], "image/jpeg"))
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            let mut inner = self.inner.lock().unwrap_or_else(|p| p.into_inner());
            inner.live_feeds = inner.live_feeds.saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(camera: &MockCamera) -> CameraController<MockCamera> {
        CameraController::new(camera.clone(), CaptureConstraints::preferred())
    }

    #[tokio::test]
    async fn test_start_capture_releases_device() {
        let camera = MockCamera::new();
        let mut ctl = controller(&camera);

        ctl.start().await.unwrap();
        assert_eq!(ctl.state(), CameraState::Active);
        assert_eq!(camera.live_feeds(), 1);

        let image = ctl.capture().unwrap().cloned().unwrap();
        assert_eq!(image.dimensions(), Some((1280, 720)));
        assert_eq!(ctl.state(), CameraState::Captured);
        assert_eq!(camera.live_feeds(), 0);
        assert!(!ctl.is_live());
    }

    #[tokio::test]
    async fn test_capture_without_feed_is_noop() {
        let camera = MockCamera::new();
        let mut ctl = controller(&camera);

        assert!(ctl.capture().unwrap().is_none());
        assert_eq!(ctl.state(), CameraState::Idle);
        assert!(camera.requests().is_empty());
    }

    #[tokio::test]
    async fn test_fallback_to_minimal_constraints_once() {
        let camera = MockCamera::new();
        camera.fail_next(CameraError::OverConstrained("width".into())).grant_next(640, 480);
        let mut ctl = controller(&camera);

        ctl.start().await.unwrap();
        assert_eq!(ctl.state(), CameraState::Active);
        assert_eq!(
            camera.requests(),
            vec![CaptureConstraints::preferred(), CaptureConstraints::minimal()]
        );
    }

    #[tokio::test]
    async fn test_fallback_failure_surfaces() {
        let camera = MockCamera::new();
        camera
            .fail_next(CameraError::Unsupported)
            .fail_next(CameraError::Unsupported);
        let mut ctl = controller(&camera);

        assert_eq!(ctl.start().await, Err(CameraError::Unsupported));
        assert_eq!(ctl.state(), CameraState::DeviceError);
        assert_eq!(camera.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_permission_denied_does_not_retry() {
        let camera = MockCamera::new();
        camera.fail_next(CameraError::PermissionDenied);
        let mut ctl = controller(&camera);

        assert_eq!(ctl.start().await, Err(CameraError::PermissionDenied));
        assert_eq!(ctl.state(), CameraState::PermissionError);
        assert_eq!(ctl.last_error(), Some(&CameraError::PermissionDenied));
        assert_eq!(camera.requests().len(), 1);

        // Explicit retry by the user
        ctl.start().await.unwrap();
        assert_eq!(ctl.state(), CameraState::Active);
        assert!(ctl.last_error().is_none());
    }

    #[tokio::test]
    async fn test_busy_device_is_device_error() {
        let camera = MockCamera::new();
        camera.fail_next(CameraError::DeviceBusy);
        let mut ctl = controller(&camera);

        assert_eq!(ctl.start().await, Err(CameraError::DeviceBusy));
        assert_eq!(ctl.state(), CameraState::DeviceError);
        assert_eq!(camera.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_retake_from_captured_restarts() {
        let camera = MockCamera::new();
        let mut ctl = controller(&camera);
        ctl.start().await.unwrap();
        ctl.capture().unwrap();

        ctl.retake().await.unwrap();
        assert_eq!(ctl.state(), CameraState::Active);
        assert!(ctl.still().is_none());
        assert_eq!(camera.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_retake_without_photo_waits_for_user() {
        let camera = MockCamera::new();
        camera.fail_next(CameraError::DeviceUnavailable);
        let mut ctl = controller(&camera);
        ctl.start().await.ok();

        ctl.retake().await.unwrap();
        assert_eq!(ctl.state(), CameraState::Idle);
        assert_eq!(camera.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_stop_is_idempotent() {
        let camera = MockCamera::new();
        let mut ctl = controller(&camera);
        ctl.start().await.unwrap();

        ctl.stop();
        ctl.stop();
        assert_eq!(ctl.state(), CameraState::Idle);
        assert_eq!(camera.live_feeds(), 0);
    }

    #[tokio::test]
    async fn test_frame_failure_releases_device() {
        let camera = MockCamera::new();
        camera.fail_frames(CameraError::Capture("sensor glitch".into()));
        let mut ctl = controller(&camera);
        ctl.start().await.unwrap();

        assert!(ctl.capture().is_err());
        assert_eq!(ctl.state(), CameraState::DeviceError);
        assert_eq!(camera.live_feeds(), 0);
    }

    #[tokio::test]
    async fn test_drop_releases_device() {
        let camera = MockCamera::new();
        {
            let mut ctl = controller(&camera);
            ctl.start().await.unwrap();
            assert_eq!(camera.live_feeds(), 1);
        }
        assert_eq!(camera.live_feeds(), 0);
    }

    #[tokio::test]
    async fn test_close_discards_photo() {
        let camera = MockCamera::new();
        let mut ctl = controller(&camera);
        ctl.start().await.unwrap();
        ctl.capture().unwrap();

        ctl.close();
        assert!(ctl.still().is_none());
        assert_eq!(ctl.state(), CameraState::Idle);
    }
}
