//! Interactive add-product session.
//!
//! Two views share one prompt. The form view edits fields; `scan` saves the
//! draft, unmounts the form and opens the scanner view over an image file.
//! Leaving the scanner mounts a fresh form, which restores the draft and
//! applies the scan result.

use crate::camera::FileCamera;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use freshtrack_domain::traits::{AuthProvider, ProductStore};
use freshtrack_domain::{Category, ScanKind};
use freshtrack_gateway::TextExtractor;
use freshtrack_scan::{
    CameraController, CameraState, CaptureConstraints, DraftCoordinator, Navigator, ProductForm,
    Scanner, View,
};
use freshtrack_store::MemorySessionStorage;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::fmt::Display;
use std::path::PathBuf;
use tracing::debug;

/// Command typed in the form view.
#[derive(Debug, Clone, PartialEq)]
pub enum FormCommand {
    /// Set the name
    Name(String),
    /// Set the category
    Category(Category),
    /// Set the expiry date text
    Expiry(String),
    /// Set the notes
    Notes(String),
    /// Print the fields
    Show,
    /// Open the scanner on an image file
    Scan(ScanKind, PathBuf),
    /// Validate and save
    Submit,
    /// Discard the form
    Cancel,
    /// Print help
    Help,
    /// Leave the session
    Exit,
}

/// Command typed in the scanner view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScannerCommand {
    /// Start or retry the camera
    Start,
    /// Take the photo
    Capture,
    /// Discard the photo and go live again
    Retake,
    /// Extract from the photo and return to the form
    Use,
    /// Return to the form without a result
    Back,
    /// Print help
    Help,
    /// Leave the session
    Exit,
}

/// What the loop should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    /// Print this and keep reading
    Continue(String),
    /// Stop
    Exit,
}

fn split_command(line: &str) -> (&str, &str) {
    let line = line.trim();
    match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    }
}

/// Parse a form-view command line.
pub fn parse_form_command(line: &str) -> Result<FormCommand> {
    let (head, rest) = split_command(line);

    match head {
        "exit" | "quit" | "q" => Ok(FormCommand::Exit),
        "help" | "?" => Ok(FormCommand::Help),
        "show" => Ok(FormCommand::Show),
        "submit" | "save" => Ok(FormCommand::Submit),
        "cancel" => Ok(FormCommand::Cancel),
        "name" => Ok(FormCommand::Name(rest.to_string())),
        "expiry" => Ok(FormCommand::Expiry(rest.to_string())),
        "notes" => Ok(FormCommand::Notes(rest.to_string())),
        "category" => Category::parse(rest)
            .map(FormCommand::Category)
            .ok_or_else(|| CliError::InvalidInput(format!("Unknown category: {}", rest))),
        "scan" => {
            let (target, path) = split_command(rest);
            let kind = match target {
                "name" => ScanKind::ProductName,
                "expiry" => ScanKind::ExpiryDate,
                _ => {
                    return Err(CliError::InvalidInput(
                        "Usage: scan name|expiry <image-path>".to_string(),
                    ))
                }
            };
            if path.is_empty() {
                return Err(CliError::InvalidInput(
                    "Usage: scan name|expiry <image-path>".to_string(),
                ));
            }
            Ok(FormCommand::Scan(kind, PathBuf::from(path)))
        }
        _ => Err(CliError::InvalidInput(format!(
            "Unknown command: {}. Type 'help' for available commands.",
            head
        ))),
    }
}

/// Parse a scanner-view command line.
pub fn parse_scanner_command(line: &str) -> Result<ScannerCommand> {
    let (head, _) = split_command(line);

    match head {
        "exit" | "quit" | "q" => Ok(ScannerCommand::Exit),
        "help" | "?" => Ok(ScannerCommand::Help),
        "start" => Ok(ScannerCommand::Start),
        "capture" | "snap" => Ok(ScannerCommand::Capture),
        "retake" => Ok(ScannerCommand::Retake),
        "use" => Ok(ScannerCommand::Use),
        "back" | "close" => Ok(ScannerCommand::Back),
        _ => Err(CliError::InvalidInput(format!(
            "Unknown command: {}. Type 'help' for available commands.",
            head
        ))),
    }
}

/// State of one interactive session.
pub struct FormSession<'a, P, A, X: TextExtractor + ?Sized> {
    nav: Navigator,
    session: &'a MemorySessionStorage,
    draft_slot: String,
    constraints: CaptureConstraints,
    form: Option<ProductForm<&'a MemorySessionStorage>>,
    scanner: Option<Scanner<'a, FileCamera, X>>,
    store: &'a mut P,
    auth: &'a A,
    extractor: &'a X,
    formatter: &'a Formatter,
}

impl<'a, P, A, X> FormSession<'a, P, A, X>
where
    P: ProductStore,
    P::Error: Display,
    A: AuthProvider,
    X: TextExtractor + ?Sized,
{
    /// Open a session on the form view.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        session: &'a MemorySessionStorage,
        draft_slot: impl Into<String>,
        constraints: CaptureConstraints,
        store: &'a mut P,
        auth: &'a A,
        extractor: &'a X,
        formatter: &'a Formatter,
    ) -> Self {
        let mut state = Self {
            nav: Navigator::new(),
            session,
            draft_slot: draft_slot.into(),
            constraints,
            form: None,
            scanner: None,
            store,
            auth,
            extractor,
            formatter,
        };
        state.mount_form();
        state
    }

    /// The mounted view.
    pub fn view(&self) -> View {
        self.nav.current()
    }

    /// The mounted form, if the form view is showing.
    pub fn form(&self) -> Option<&ProductForm<&'a MemorySessionStorage>> {
        self.form.as_ref()
    }

    /// Camera state, if the scanner view is showing.
    pub fn camera_state(&self) -> Option<CameraState> {
        self.scanner.as_ref().map(|s| s.camera_state())
    }

    /// Prompt for the mounted view.
    pub fn prompt(&self) -> String {
        match self.nav.current() {
            View::Form => "freshtrack form> ".to_string(),
            View::Scanner(kind) => format!("freshtrack scan {}> ", kind),
        }
    }

    /// Run one command line against the mounted view.
    pub async fn execute(&mut self, line: &str) -> Result<Flow> {
        match self.nav.current() {
            View::Form => {
                let command = parse_form_command(line)?;
                self.execute_form(command).await
            }
            View::Scanner(_) => {
                let command = parse_scanner_command(line)?;
                self.execute_scanner(command).await
            }
        }
    }

    fn mount_form(&mut self) -> Option<String> {
        let drafts = DraftCoordinator::new(self.session, self.draft_slot.clone());
        let (form, scanned) = ProductForm::mount(drafts, &mut self.nav);
        self.form = Some(form);
        scanned.map(|result| self.formatter.scan_result(&result))
    }

    fn show_fields(&self) -> String {
        match &self.form {
            Some(form) => self.formatter.format_fields(form.fields()),
            None => String::new(),
        }
    }

    async fn execute_form(&mut self, command: FormCommand) -> Result<Flow> {
        let Some(form) = self.form.as_mut() else {
            return Err(CliError::InvalidInput("The form is not open".to_string()));
        };

        let message = match command {
            FormCommand::Exit => {
                form.cancel();
                return Ok(Flow::Exit);
            }
            FormCommand::Help => form_help(),
            FormCommand::Show => self.show_fields(),
            FormCommand::Name(name) => {
                form.set_name(name);
                self.show_fields()
            }
            FormCommand::Category(category) => {
                form.set_category(category);
                self.show_fields()
            }
            FormCommand::Expiry(expiry) => {
                form.set_expiry_date(expiry);
                self.show_fields()
            }
            FormCommand::Notes(notes) => {
                form.set_notes(notes);
                self.show_fields()
            }
            FormCommand::Cancel => {
                form.cancel();
                self.formatter.info("Form cleared")
            }
            FormCommand::Submit => match form.submit(&mut *self.store, self.auth) {
                Ok(product) => self.formatter.product_added(&product),
                Err(e) => self.formatter.error(&e.to_string()),
            },
            FormCommand::Scan(kind, path) => {
                let request = form.handle_scan(kind, &mut self.nav)?;
                self.form = None;
                debug!(kind = %request.kind, path = %path.display(), "Form unmounted for scan");
                return self.open_scanner(request.kind, path).await;
            }
        };

        Ok(Flow::Continue(message))
    }

    async fn open_scanner(&mut self, kind: ScanKind, path: PathBuf) -> Result<Flow> {
        let camera = CameraController::new(FileCamera::new(path), self.constraints);
        let scanner = self.scanner.insert(Scanner::new(kind, camera, self.extractor));

        let message = match scanner.mount().await {
            Ok(()) => self.formatter.info(&format!(
                "Scanning {}. Type 'capture', then 'use' (or 'back').",
                kind.label().to_lowercase()
            )),
            Err(e) => self.formatter.warning(&e.user_message()),
        };
        Ok(Flow::Continue(message))
    }

    async fn execute_scanner(&mut self, command: ScannerCommand) -> Result<Flow> {
        let Some(scanner) = self.scanner.as_mut() else {
            return Err(CliError::InvalidInput("The scanner is not open".to_string()));
        };

        let message = match command {
            ScannerCommand::Help => scanner_help(),
            ScannerCommand::Start => match scanner.start().await {
                Ok(()) => self.formatter.info("Camera ready. Type 'capture'."),
                Err(e) => self.formatter.warning(&e.user_message()),
            },
            ScannerCommand::Capture => match scanner.capture() {
                Ok(true) => self.formatter.info("Photo captured. Type 'use' or 'retake'."),
                Ok(false) => self.formatter.warning("Camera is not running. Type 'start'."),
                Err(e) => self.formatter.warning(&e.user_message()),
            },
            ScannerCommand::Retake => match scanner.retake().await {
                Ok(()) if scanner.camera_state() == CameraState::Active => {
                    self.formatter.info("Camera ready. Type 'capture'.")
                }
                Ok(()) => self.formatter.info("Type 'start' to use the camera."),
                Err(e) => self.formatter.warning(&e.user_message()),
            },
            ScannerCommand::Use => match scanner.use_photo().await {
                Ok(result) => {
                    if let Some(scanner) = self.scanner.take() {
                        scanner.finish(&mut self.nav, Some(result));
                    }
                    let mut lines: Vec<String> = self.mount_form().into_iter().collect();
                    lines.push(self.show_fields());
                    lines.join("\n")
                }
                Err(e) if e.is_recoverable() => self.formatter.warning(&format!(
                    "{} Type 'start' to take another photo.",
                    e.user_message()
                )),
                Err(e) => self.formatter.error(&e.user_message()),
            },
            ScannerCommand::Back => {
                if let Some(scanner) = self.scanner.take() {
                    scanner.finish(&mut self.nav, None);
                }
                self.mount_form();
                format!("{}\n{}", self.formatter.info("Back to form"), self.show_fields())
            }
            ScannerCommand::Exit => {
                if let Some(mut scanner) = self.scanner.take() {
                    scanner.close();
                }
                DraftCoordinator::new(self.session, self.draft_slot.clone()).clear();
                return Ok(Flow::Exit);
            }
        };

        Ok(Flow::Continue(message))
    }
}

/// Run the interactive session until the user exits.
pub async fn run_form_session<P, A, X>(
    config: &Config,
    store: &mut P,
    auth: &A,
    extractor: &X,
    formatter: &Formatter,
) -> Result<()>
where
    P: ProductStore,
    P::Error: Display,
    A: AuthProvider,
    X: TextExtractor + ?Sized,
{
    println!(
        "{}",
        formatter.info("FreshTrack - Add a product. Type 'help' for commands, 'exit' to quit")
    );
    println!();

    let mut editor = DefaultEditor::new().map_err(|e| {
        CliError::Io(std::io::Error::other(format!(
            "Failed to initialize editor: {}",
            e
        )))
    })?;

    let history_path = get_history_path()?;
    let _ = editor.load_history(&history_path);

    let session = MemorySessionStorage::new();
    let mut state = FormSession::new(
        &session,
        config.scan.draft_slot.clone(),
        config.scan.preferred_constraints(),
        store,
        auth,
        extractor,
        formatter,
    );

    loop {
        match editor.readline(&state.prompt()) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                editor.add_history_entry(line.as_str()).ok();

                match state.execute(&line).await {
                    Ok(Flow::Exit) => {
                        println!("{}", formatter.info("Goodbye!"));
                        break;
                    }
                    Ok(Flow::Continue(message)) => {
                        if !message.is_empty() {
                            println!("{}", message);
                        }
                    }
                    Err(e) => eprintln!("{}", formatter.error(&e.to_string())),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use 'exit' to quit"));
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    editor.save_history(&history_path).ok();
    Ok(())
}

fn get_history_path() -> Result<PathBuf> {
    let dir = Config::home()?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join("history.txt"))
}

fn form_help() -> String {
    [
        "Form commands:",
        "  name <text>                    - Set the product name",
        "  category <label>               - Set the category (e.g. Dairy, Frozen)",
        "  expiry <YYYY-MM-DD>            - Set the expiry date",
        "  notes <text>                   - Set notes",
        "  show                           - Show the form",
        "  scan name|expiry <image-path>  - Fill a field from a photo",
        "  submit                         - Save the product",
        "  cancel                         - Clear the form",
        "  help, ?                        - Show this help",
        "  exit, quit, q                  - Leave",
    ]
    .join("\n")
}

fn scanner_help() -> String {
    [
        "Scanner commands:",
        "  start    - Start the camera (or try again)",
        "  capture  - Take the photo",
        "  retake   - Discard the photo and take another",
        "  use      - Extract text and return to the form",
        "  back     - Return to the form without a result",
        "  exit     - Leave",
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use freshtrack_domain::traits::SessionStorage;
    use freshtrack_domain::UserId;
    use freshtrack_gateway::MockExtractor;
    use freshtrack_store::{SqliteStore, StaticAuth};
    use tempfile::TempDir;

    #[test]
    fn test_parse_form_commands() {
        assert_eq!(
            parse_form_command("name  Oat milk ").unwrap(),
            FormCommand::Name("Oat milk".to_string())
        );
        assert_eq!(
            parse_form_command("category meat & poultry").unwrap(),
            FormCommand::Category(Category::MeatAndPoultry)
        );
        assert_eq!(
            parse_form_command("scan expiry /tmp/label 1.jpg").unwrap(),
            FormCommand::Scan(ScanKind::ExpiryDate, PathBuf::from("/tmp/label 1.jpg"))
        );
        assert_eq!(parse_form_command("name").unwrap(), FormCommand::Name(String::new()));
        assert!(parse_form_command("scan barcode x.jpg").is_err());
        assert!(parse_form_command("scan name").is_err());
        assert!(parse_form_command("category toys").is_err());
        assert!(parse_form_command("fly").is_err());
    }

    #[test]
    fn test_parse_scanner_commands() {
        assert_eq!(parse_scanner_command("capture").unwrap(), ScannerCommand::Capture);
        assert_eq!(parse_scanner_command(" use ").unwrap(), ScannerCommand::Use);
        assert_eq!(parse_scanner_command("back").unwrap(), ScannerCommand::Back);
        assert!(parse_scanner_command("name Milk").is_err());
    }

    #[tokio::test]
    async fn test_scan_round_trip_through_session() {
        let dir = TempDir::new().unwrap();
        let image = dir.path().join("label.jpg");
        std::fs::write(&image, [0xff, 0xd8, 0xff, 0xd9]).unwrap();

        let session = MemorySessionStorage::new();
        let mut store = SqliteStore::new(":memory:").unwrap();
        let auth = StaticAuth::signed_in("alice");
        let extractor = MockExtractor::new("2025-12-31");
        let formatter = Formatter::new(OutputFormat::Table, false);
        let mut state = FormSession::new(
            &session,
            "draft",
            CaptureConstraints::preferred(),
            &mut store,
            &auth,
            &extractor,
            &formatter,
        );

        state.execute("name Milk").await.unwrap();
        state
            .execute(&format!("scan expiry {}", image.display()))
            .await
            .unwrap();
        assert_eq!(state.view(), View::Scanner(ScanKind::ExpiryDate));
        assert!(state.form().is_none());
        assert!(session.get_item("draft").is_some());

        state.execute("capture").await.unwrap();
        let Flow::Continue(message) = state.execute("use").await.unwrap() else {
            panic!("Expected to continue");
        };
        assert!(message.contains("Expiry date detected!"));
        assert_eq!(state.view(), View::Form);

        let fields = state.form().unwrap().fields().clone();
        assert_eq!(fields.name, "Milk");
        assert_eq!(fields.expiry_date, "2025-12-31");
        assert!(session.get_item("draft").is_none());

        state.execute("submit").await.unwrap();
        drop(state);
        assert_eq!(store.list(&UserId::new("alice")).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_image_stays_in_scanner() {
        let dir = TempDir::new().unwrap();
        let session = MemorySessionStorage::new();
        let mut store = SqliteStore::new(":memory:").unwrap();
        let auth = StaticAuth::signed_in("alice");
        let extractor = MockExtractor::default();
        let formatter = Formatter::new(OutputFormat::Table, false);
        let mut state = FormSession::new(
            &session,
            "draft",
            CaptureConstraints::preferred(),
            &mut store,
            &auth,
            &extractor,
            &formatter,
        );

        state.execute("notes keep cold").await.unwrap();
        let missing = dir.path().join("missing.jpg");
        let flow = state
            .execute(&format!("scan name {}", missing.display()))
            .await
            .unwrap();
        assert_eq!(
            flow,
            Flow::Continue("⚠ No camera found on this device.".to_string())
        );
        assert_eq!(state.camera_state(), Some(CameraState::DeviceError));

        state.execute("back").await.unwrap();
        assert_eq!(state.form().unwrap().fields().notes, "keep cold");
    }

    #[tokio::test]
    async fn test_submit_error_keeps_fields() {
        let session = MemorySessionStorage::new();
        let mut store = SqliteStore::new(":memory:").unwrap();
        let auth = StaticAuth::signed_in("alice");
        let extractor = MockExtractor::default();
        let formatter = Formatter::new(OutputFormat::Table, false);
        let mut state = FormSession::new(
            &session,
            "draft",
            CaptureConstraints::preferred(),
            &mut store,
            &auth,
            &extractor,
            &formatter,
        );

        state.execute("expiry 2025-01-01").await.unwrap();
        let flow = state.execute("submit").await.unwrap();
        assert_eq!(flow, Flow::Continue("✗ Please enter a product name".to_string()));
        assert_eq!(state.form().unwrap().fields().expiry_date, "2025-01-01");
    }
}
