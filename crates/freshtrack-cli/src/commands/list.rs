//! List command implementation.

use crate::cli::ListArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use chrono::NaiveDate;
use freshtrack_domain::listing::categories_present;
use freshtrack_domain::traits::{AuthProvider, ProductStore};
use freshtrack_domain::{InventoryStats, ProductFilter};
use freshtrack_store::StoreError;

/// Execute the list command.
///
/// Stats cover every product; the table shows only the filtered ones.
pub fn execute_list<P, A>(
    args: ListArgs,
    store: &P,
    auth: &A,
    formatter: &Formatter,
    today: NaiveDate,
) -> Result<String>
where
    P: ProductStore<Error = StoreError>,
    A: AuthProvider,
{
    let owner = auth.current_user().ok_or(CliError::NotSignedIn)?;
    let products = store.list(&owner)?;

    let filter = ProductFilter {
        search: args.search.filter(|s| !s.trim().is_empty()),
        category: args.category,
        status: args.status.map(Into::into),
    };
    let shown = filter.apply(&products, today);

    let mut sections = Vec::new();
    let stats = formatter.format_stats(&InventoryStats::compute(&products, today))?;
    if !stats.is_empty() {
        sections.push(stats);
    }
    sections.push(formatter.format_products(&shown, today)?);
    if let Some(line) = formatter.format_categories(&categories_present(&products)) {
        sections.push(line);
    }

    let output = sections.join("\n");
    println!("{}", output);
    Ok(output)
}
