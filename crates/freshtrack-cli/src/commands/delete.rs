//! Delete command implementation.

use crate::cli::DeleteArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use freshtrack_domain::traits::{AuthProvider, ProductStore};
use freshtrack_domain::ProductId;
use freshtrack_store::StoreError;

/// Execute the delete command.
pub fn execute_delete<P, A>(args: DeleteArgs, store: &mut P, auth: &A, formatter: &Formatter) -> Result<()>
where
    P: ProductStore<Error = StoreError>,
    A: AuthProvider,
{
    let owner = auth.current_user().ok_or(CliError::NotSignedIn)?;
    let id = ProductId::from_string(args.id.trim())
        .map_err(|e| CliError::InvalidInput(format!("Invalid ID '{}': {}", args.id, e)))?;

    store.delete(&owner, id)?;
    println!("{}", formatter.success(&format!("Product deleted: {}", id)));
    Ok(())
}
