//! FreshTrack CLI library.
//!
//! Command-line front end for the FreshTrack pantry tracker: configuration,
//! command execution, the interactive add-product session, and output
//! formatting.

pub mod auth;
pub mod camera;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod repl;

pub use auth::ConfigAuth;
pub use camera::FileCamera;
pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
