//! Add command implementation.

use crate::cli::AddArgs;
use crate::error::Result;
use crate::output::Formatter;
use freshtrack_domain::traits::{AuthProvider, ProductStore};
use freshtrack_domain::Product;
use freshtrack_scan::config::DEFAULT_DRAFT_SLOT;
use freshtrack_scan::{DraftCoordinator, ProductForm};
use freshtrack_store::MemorySessionStorage;
use std::fmt::Display;

/// Execute the add command.
///
/// Runs the same validation as the interactive form; a one-shot command has
/// no scan round trip, so its draft slot lives only for this call.
pub fn execute_add<P, A>(args: AddArgs, store: &mut P, auth: &A, formatter: &Formatter) -> Result<Product>
where
    P: ProductStore,
    P::Error: Display,
    A: AuthProvider,
{
    let session = MemorySessionStorage::new();
    let mut form = ProductForm::new(DraftCoordinator::new(&session, DEFAULT_DRAFT_SLOT));
    form.set_name(args.name);
    form.set_category(args.category);
    form.set_expiry_date(args.expiry);
    form.set_notes(args.notes.unwrap_or_default());

    let product = form.submit(store, auth)?;
    println!("{}", formatter.product_added(&product));
    Ok(product)
}
