//! Auth provider backed by the `[account]` config section.

use crate::config::Config;
use crate::error::{CliError, Result};
use freshtrack_domain::traits::AuthProvider;
use freshtrack_domain::UserId;
use std::path::PathBuf;
use tracing::info;

/// The signed-in identity, persisted in the config file.
#[derive(Debug, Clone)]
pub struct ConfigAuth {
    config: Config,
    path: PathBuf,
}

impl ConfigAuth {
    /// Wrap `config`, persisting changes to `path`.
    pub fn new(config: Config, path: impl Into<PathBuf>) -> Self {
        Self {
            config,
            path: path.into(),
        }
    }

    /// Sign in as `user` and save.
    pub fn sign_in(&mut self, user: &str) -> Result<UserId> {
        let user = user.trim();
        if user.is_empty() {
            return Err(CliError::InvalidInput("User id must not be empty".to_string()));
        }
        self.config.account.user_id = Some(user.to_string());
        self.config.save_to(&self.path)?;
        info!(user = %user, "Signed in");
        Ok(UserId::new(user))
    }

    /// The signed-in user, or `NotSignedIn`.
    pub fn require_user(&self) -> Result<UserId> {
        self.current_user().ok_or(CliError::NotSignedIn)
    }

    /// Configuration as last saved.
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl AuthProvider for ConfigAuth {
    type Error = CliError;

    fn current_user(&self) -> Option<UserId> {
        self.config
            .account
            .user_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .map(UserId::new)
    }

    fn sign_out(&mut self) -> Result<()> {
        self.config.account.user_id = None;
        self.config.save_to(&self.path)?;
        info!("Signed out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sign_in_and_out_persist() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let mut auth = ConfigAuth::new(Config::default(), &path);
        assert!(auth.current_user().is_none());

        auth.sign_in(" alice ").unwrap();
        assert_eq!(auth.current_user(), Some(UserId::new("alice")));
        let saved = Config::load_from(&path).unwrap();
        assert_eq!(saved.account.user_id.as_deref(), Some("alice"));

        auth.sign_out().unwrap();
        assert!(auth.current_user().is_none());
        assert!(Config::load_from(&path).unwrap().account.user_id.is_none());
    }

    #[test]
    fn test_blank_user_rejected() {
        let dir = TempDir::new().unwrap();
        let mut auth = ConfigAuth::new(Config::default(), dir.path().join("config.toml"));
        assert!(matches!(auth.sign_in("  "), Err(CliError::InvalidInput(_))));
        assert!(matches!(auth.require_user(), Err(CliError::NotSignedIn)));
    }
}
