//! FreshTrack Scan Flow
//!
//! The add-product flow with photo scanning: the form, the full-screen
//! scanner, and the draft that carries the form's state across the switch
//! between them.
//!
//! # Round trip
//!
//! ```text
//! form: handle_scan ── save draft ──▶ navigator: Scanner(kind)
//! scanner: mount ─▶ capture ─▶ use_photo ─▶ finish(result)
//! navigator: Form ──▶ form: resume ── restore ─▶ merge ─▶ apply scan ─▶ clear
//! ```
//!
//! Each step completes before the next starts. Only one view is mounted at
//! a time, so only one round trip can be in flight.
//!
//! # Components
//!
//! - [`CameraController`]: sole owner of the camera device
//! - [`Scanner`]: camera plus extraction for one field
//! - [`DraftCoordinator`]: the single draft slot in session storage
//! - [`Navigator`]: mounted view and the one-shot scan result
//! - [`ProductForm`]: field editing, scan hand-off, and submit
//!
//! # Examples
//!
//! ```
//! use freshtrack_domain::ScanKind;
//! use freshtrack_gateway::MockExtractor;
//! use freshtrack_scan::{
//!     CameraController, CaptureConstraints, DraftCoordinator, MockCamera, Navigator,
//!     ProductForm, ScanConfig, Scanner,
//! };
//! use freshtrack_store::MemorySessionStorage;
//!
//! # async fn example() {
//! let config = ScanConfig::default();
//! let session = MemorySessionStorage::new();
//! let extractor = MockExtractor::new("2025-12-31");
//! let mut nav = Navigator::new();
//!
//! let mut form = ProductForm::new(DraftCoordinator::new(&session, config.draft_slot.clone()));
//! form.set_name("Milk");
//! let request = form.handle_scan(ScanKind::ExpiryDate, &mut nav).unwrap();
//! drop(form);
//!
//! let camera = CameraController::new(MockCamera::new(), config.preferred_constraints());
//! let mut scanner = Scanner::new(request.kind, camera, &extractor);
//! scanner.mount().await.unwrap();
//! scanner.capture().unwrap();
//! let result = scanner.use_photo().await.unwrap();
//! scanner.finish(&mut nav, Some(result));
//!
//! let (form, _) = ProductForm::mount(DraftCoordinator::new(&session, config.draft_slot), &mut nav);
//! assert_eq!(form.fields().name, "Milk");
//! assert_eq!(form.fields().expiry_date, "2025-12-31");
//! # }
//! ```

#![warn(missing_docs)]

pub mod camera;
pub mod config;
pub mod draft;
pub mod error;
pub mod form;
pub mod navigation;
pub mod scanner;

pub use camera::{
    CameraController, CameraDevice, CameraError, CameraState, CaptureConstraints, MockCamera,
    MockFeed, VideoFeed,
};
pub use config::ScanConfig;
pub use draft::DraftCoordinator;
pub use error::{detected_message, DraftError, ScanError, SubmitError};
pub use form::ProductForm;
pub use navigation::{Navigator, ScanRequest, View};
pub use scanner::Scanner;
