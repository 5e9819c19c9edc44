//! Fixed-identity auth provider

use freshtrack_domain::traits::AuthProvider;
use freshtrack_domain::UserId;
use std::convert::Infallible;

/// `AuthProvider` holding a fixed identity until signed out
///
/// Useful for tests and for callers that resolve the identity up front.
#[derive(Debug, Clone, Default)]
pub struct StaticAuth {
    user: Option<UserId>,
}

impl StaticAuth {
    /// Signed in as `user`
    pub fn signed_in(user: impl Into<String>) -> Self {
        Self {
            user: Some(UserId::new(user)),
        }
    }

    /// Nobody signed in
    pub fn signed_out() -> Self {
        Self { user: None }
    }
}

impl AuthProvider for StaticAuth {
    type Error = Infallible;

    fn current_user(&self) -> Option<UserId> {
        self.user.clone()
    }

    fn sign_out(&mut self) -> Result<(), Self::Error> {
        self.user = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_out_clears_identity() {
        let mut auth = StaticAuth::signed_in("alice");
        assert_eq!(auth.current_user(), Some(UserId::new("alice")));
        auth.sign_out().unwrap();
        assert!(auth.current_user().is_none());
    }
}
