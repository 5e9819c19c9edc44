//! View routing between the form and the scanner
//!
//! Only one view is mounted at a time. The scanner hands its result back
//! through a one-shot slot that the form drains on mount, so a result is
//! consumed exactly once even if the form is mounted again later.

use freshtrack_domain::{ScanKind, ScanResult};
use tracing::debug;

/// The mounted view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Add-product form
    Form,
    /// Scanner for one field
    Scanner(ScanKind),
}

/// Instruction to open the scanner for `kind`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanRequest {
    /// Field being scanned
    pub kind: ScanKind,
}

/// Tracks the mounted view and carries the scan result back
#[derive(Debug)]
pub struct Navigator {
    view: View,
    pending: Option<ScanResult>,
}

impl Navigator {
    /// Start on the form
    pub fn new() -> Self {
        Self {
            view: View::Form,
            pending: None,
        }
    }

    /// The mounted view
    pub fn current(&self) -> View {
        self.view
    }

    /// Unmount the form and mount the scanner
    ///
    /// Any result that was never picked up is stale by now and is dropped.
    pub fn open_scanner(&mut self, kind: ScanKind) -> ScanRequest {
        if self.pending.take().is_some() {
            debug!("Dropping unconsumed scan result");
        }
        self.view = View::Scanner(kind);
        ScanRequest { kind }
    }

    /// Unmount the scanner and mount the form, optionally with a result
    pub fn return_to_form(&mut self, result: Option<ScanResult>) {
        debug!(with_result = result.is_some(), "Returning to form");
        self.pending = result;
        self.view = View::Form;
    }

    /// Drain the pending result; later calls see `None`
    pub fn take_result(&mut self) -> Option<ScanResult> {
        self.pending.take()
    }

    /// Peek at the pending result without consuming it
    pub fn pending(&self) -> Option<&ScanResult> {
        self.pending.as_ref()
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}
