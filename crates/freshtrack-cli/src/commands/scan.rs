//! Scan command implementation.

use crate::camera::FileCamera;
use crate::cli::ScanArgs;
use crate::error::Result;
use crate::output::Formatter;
use freshtrack_domain::{ScanKind, ScanResult};
use freshtrack_gateway::TextExtractor;
use freshtrack_scan::{CameraController, CaptureConstraints, Scanner};

/// Execute the scan command.
///
/// One pass through the scanner: open the photo, capture it, extract. A
/// "nothing found" answer is printed as a notice and is not a failure.
pub async fn execute_scan<X: TextExtractor + ?Sized>(
    args: ScanArgs,
    extractor: &X,
    constraints: CaptureConstraints,
    formatter: &Formatter,
) -> Result<Option<ScanResult>> {
    let kind: ScanKind = args.kind.into();
    let camera = CameraController::new(FileCamera::new(&args.image), constraints);
    let mut scanner = Scanner::new(kind, camera, extractor);

    scanner.mount().await?;
    scanner.capture()?;

    match scanner.use_photo().await {
        Ok(result) => {
            println!("{}", formatter.scan_result(&result));
            Ok(Some(result))
        }
        Err(e) if e.is_recoverable() => {
            scanner.close();
            println!("{}", formatter.warning(&e.user_message()));
            Ok(None)
        }
        Err(e) => {
            scanner.close();
            Err(e.into())
        }
    }
}
