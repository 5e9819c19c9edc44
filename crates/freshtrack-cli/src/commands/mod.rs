//! Command implementations.

pub mod add;
pub mod auth;
pub mod delete;
pub mod list;
pub mod scan;

pub use self::add::execute_add;
pub use self::auth::{execute_login, execute_logout};
pub use self::delete::execute_delete;
pub use self::list::execute_list;
pub use self::scan::execute_scan;

use crate::config::Config;
use crate::error::Result;
use freshtrack_store::SqliteStore;
use tracing::debug;

/// Open the product database named by `config`, creating its directory.
pub fn open_store(config: &Config) -> Result<SqliteStore> {
    let path = config.database_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    debug!(path = %path.display(), "Opening product database");
    Ok(SqliteStore::new(&path)?)
}
