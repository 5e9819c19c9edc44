//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use chrono::NaiveDate;
use colored::*;
use freshtrack_domain::status::{status_label, ExpiryStatus};
use freshtrack_domain::{Category, FormFields, InventoryStats, Product, ScanResult};
use freshtrack_scan::detected_message;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format products as of `today`.
    pub fn format_products(&self, products: &[&Product], today: NaiveDate) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_products_json(products, today),
            OutputFormat::Table => Ok(self.format_products_table(products, today)),
            OutputFormat::Quiet => Ok(self.format_products_quiet(products)),
        }
    }

    fn format_products_json(&self, products: &[&Product], today: NaiveDate) -> Result<String> {
        let json_products: Vec<serde_json::Value> = products
            .iter()
            .map(|p| {
                serde_json::json!({
                    "id": p.id.to_string(),
                    "name": p.name,
                    "category": p.category,
                    "expiry_date": p.expiry_date.to_string(),
                    "status": ExpiryStatus::classify(p.expiry_date, today).as_str(),
                    "notes": p.notes,
                    "created_at": p.created_at.to_rfc3339(),
                })
            })
            .collect();

        Ok(serde_json::to_string_pretty(&json_products)?)
    }

    fn format_products_table(&self, products: &[&Product], today: NaiveDate) -> String {
        if products.is_empty() {
            return self.colorize("No products found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["ID", "Name", "Category", "Expires", "Status", "Notes"]);

        for product in products {
            let id = product.id.to_string();
            let status = ExpiryStatus::classify(product.expiry_date, today);
            let label = self.status_colored(status, &status_label(product.expiry_date, today));
            builder.push_record([
                id[..8.min(id.len())].to_string(),
                product.name.clone(),
                product.category.to_string(),
                product.expiry_date.to_string(),
                label,
                product.notes.clone().unwrap_or_default(),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    fn format_products_quiet(&self, products: &[&Product]) -> String {
        let ids: Vec<String> = products.iter().map(|p| p.id.to_string()).collect();
        ids.join("\n")
    }

    /// Format the inventory summary.
    pub fn format_stats(&self, stats: &InventoryStats) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "total": stats.total,
                "expired": stats.expired,
                "expiring": stats.expiring,
                "fresh": stats.fresh,
            }))?),
            OutputFormat::Quiet => Ok(String::new()),
            OutputFormat::Table => Ok(format!(
                "{} total · {} · {} · {}",
                stats.total,
                self.status_colored(ExpiryStatus::Expired, &format!("{} expired", stats.expired)),
                self.status_colored(
                    ExpiryStatus::Expiring,
                    &format!("{} expiring soon", stats.expiring)
                ),
                self.status_colored(ExpiryStatus::Fresh, &format!("{} fresh", stats.fresh)),
            )),
        }
    }

    /// Categories available as filter choices; table mode only.
    pub fn format_categories(&self, categories: &[Category]) -> Option<String> {
        if categories.is_empty() || !matches!(self.format, OutputFormat::Table) {
            return None;
        }
        let labels: Vec<&str> = categories.iter().map(|c| c.as_str()).collect();
        Some(self.info(&format!("Categories: {}", labels.join(", "))))
    }

    /// Format the current form fields.
    pub fn format_fields(&self, fields: &FormFields) -> String {
        let show = |value: &str| {
            if value.is_empty() {
                "(empty)".to_string()
            } else {
                value.to_string()
            }
        };

        format!(
            "  Name:     {}\n  Category: {}\n  Expiry:   {}\n  Notes:    {}",
            show(&fields.name),
            fields.category,
            show(&fields.expiry_date),
            show(&fields.notes),
        )
    }

    /// Format product creation result.
    pub fn product_added(&self, product: &Product) -> String {
        match self.format {
            OutputFormat::Quiet => product.id.to_string(),
            _ => self.success(&format!("Product added: {} ({})", product.name, product.id)),
        }
    }

    /// Format a scan result.
    pub fn scan_result(&self, result: &ScanResult) -> String {
        match self.format {
            OutputFormat::Quiet => result.text.clone(),
            OutputFormat::Json => serde_json::json!({
                "kind": result.kind,
                "text": result.text,
            })
            .to_string(),
            OutputFormat::Table => {
                self.success(&format!("{} {}", detected_message(result.kind), result.text))
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn status_colored(&self, status: ExpiryStatus, text: &str) -> String {
        match status {
            ExpiryStatus::Expired => self.colorize(text, "red"),
            ExpiryStatus::Expiring => self.colorize(text, "yellow"),
            ExpiryStatus::Fresh => self.colorize(text, "green"),
        }
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}
