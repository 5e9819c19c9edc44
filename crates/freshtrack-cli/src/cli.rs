//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use freshtrack_domain::status::ExpiryStatus;
use freshtrack_domain::{Category, ScanKind};
use std::path::PathBuf;

/// FreshTrack CLI - Track what is in the pantry and when it expires.
#[derive(Debug, Parser)]
#[command(name = "freshtrack")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "FRESHTRACK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (IDs only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a product
    Add(AddArgs),

    /// List products with their freshness
    List(ListArgs),

    /// Delete a product
    Delete(DeleteArgs),

    /// Extract a product name or expiry date from a photo
    Scan(ScanArgs),

    /// Interactive add-product form with photo scanning
    Form,

    /// Sign in
    Login(LoginArgs),

    /// Sign out
    Logout,
}

/// Arguments for the add command.
#[derive(Debug, Parser)]
pub struct AddArgs {
    /// Product name
    #[arg(short, long)]
    pub name: String,

    /// Category label (e.g. "Dairy", "Meat & Poultry")
    #[arg(short, long, value_parser = parse_category, default_value = "Other")]
    pub category: Category,

    /// Expiry date (YYYY-MM-DD)
    #[arg(short, long)]
    pub expiry: String,

    /// Free-text notes
    #[arg(long)]
    pub notes: Option<String>,
}

/// Arguments for the list command.
#[derive(Debug, Parser)]
pub struct ListArgs {
    /// Name contains (case-insensitive)
    #[arg(short, long)]
    pub search: Option<String>,

    /// Only this category
    #[arg(short, long, value_parser = parse_category)]
    pub category: Option<Category>,

    /// Only this freshness status
    #[arg(long, value_enum)]
    pub status: Option<StatusArg>,
}

/// Arguments for the delete command.
#[derive(Debug, Parser)]
pub struct DeleteArgs {
    /// Product ID
    pub id: String,
}

/// Arguments for the scan command.
#[derive(Debug, Parser)]
pub struct ScanArgs {
    /// What to extract
    #[arg(value_enum)]
    pub kind: ScanKindArg,

    /// Photo of the label
    pub image: PathBuf,
}

/// Arguments for the login command.
#[derive(Debug, Parser)]
pub struct LoginArgs {
    /// User identifier
    pub user_id: String,
}

/// Freshness status argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum StatusArg {
    /// Past the expiry date
    Expired,
    /// Expires within three days
    Expiring,
    /// Everything else
    Fresh,
}

/// Scan kind argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ScanKindArg {
    /// Product name from the packaging
    ProductName,
    /// Expiry or best-before date
    ExpiryDate,
}

fn parse_category(s: &str) -> Result<Category, String> {
    Category::parse(s).ok_or_else(|| {
        let labels: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
        format!("unknown category '{}' (expected one of: {})", s, labels.join(", "))
    })
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<StatusArg> for ExpiryStatus {
    fn from(status: StatusArg) -> Self {
        match status {
            StatusArg::Expired => ExpiryStatus::Expired,
            StatusArg::Expiring => ExpiryStatus::Expiring,
            StatusArg::Fresh => ExpiryStatus::Fresh,
        }
    }
}

impl From<ScanKindArg> for ScanKind {
    fn from(kind: ScanKindArg) -> Self {
        match kind {
            ScanKindArg::ProductName => ScanKind::ProductName,
            ScanKindArg::ExpiryDate => ScanKind::ExpiryDate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand() {
        let cli = Cli::parse_from(["freshtrack"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_add_command() {
        let cli = Cli::parse_from([
            "freshtrack",
            "add",
            "--name",
            "Chicken thighs",
            "--category",
            "meat & poultry",
            "--expiry",
            "2025-05-01",
        ]);
        match cli.command {
            Some(Command::Add(args)) => {
                assert_eq!(args.category, Category::MeatAndPoultry);
                assert!(args.notes.is_none());
            }
            _ => panic!("Expected Add command"),
        }
    }

    #[test]
    fn test_add_defaults_to_other() {
        let cli = Cli::parse_from(["freshtrack", "add", "-n", "Rice", "-e", "2026-01-01"]);
        match cli.command {
            Some(Command::Add(args)) => assert_eq!(args.category, Category::Other),
            _ => panic!("Expected Add command"),
        }
    }

    #[test]
    fn test_unknown_category_rejected() {
        let result = Cli::try_parse_from(["freshtrack", "list", "--category", "Toys"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_scan_command() {
        let cli = Cli::parse_from(["freshtrack", "scan", "expiry-date", "label.jpg"]);
        match cli.command {
            Some(Command::Scan(args)) => {
                assert_eq!(ScanKind::from(args.kind), ScanKind::ExpiryDate);
                assert_eq!(args.image, PathBuf::from("label.jpg"));
            }
            _ => panic!("Expected Scan command"),
        }
    }

    #[test]
    fn test_status_conversion() {
        let status: ExpiryStatus = StatusArg::Expiring.into();
        assert_eq!(status, ExpiryStatus::Expiring);
    }
}
