use async_trait::async_trait;
use lmn_core::{AuthProvider, CollaboratorError};
use std::sync::RwLock;

/// Bearer token configured at startup (for example from `LMN_ACCESS_TOKEN`).
///
/// `logout` forgets the token; `login` fails once it is gone since there is no identity
/// provider to obtain a new one from.
pub struct StaticTokenAuth {
    token: RwLock<Option<String>>,
    identity: Option<String>,
}

impl StaticTokenAuth {
    pub fn new(token: Option<String>, identity: Option<String>) -> Self {
        Self {
            token: RwLock::new(token.filter(|t| !t.trim().is_empty())),
            identity,
        }
    }

    fn has_token(&self) -> bool {
        self.token.read().map(|t| t.is_some()).unwrap_or(false)
    }
}

#[async_trait]
impl AuthProvider for StaticTokenAuth {
    async fn login(&self) -> Result<(), CollaboratorError> {
        if self.has_token() {
            Ok(())
        } else {
            Err(CollaboratorError::Unauthenticated)
        }
    }

    async fn logout(&self) -> Result<(), CollaboratorError> {
        let mut token = self
            .token
            .write()
            .map_err(|_| CollaboratorError::Unavailable("token lock poisoned".into()))?;
        *token = None;
        Ok(())
    }

    async fn access_token(&self) -> Option<String> {
        self.token.read().ok().and_then(|t| t.clone())
    }

    fn current_identity(&self) -> Option<String> {
        if self.has_token() {
            self.identity.clone()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_logout_clears_token() {
        let auth = StaticTokenAuth::new(Some("abc".into()), Some("doctor@example.com".into()));
        auth.login().await.unwrap();
        assert_eq!(auth.access_token().await.as_deref(), Some("abc"));
        assert_eq!(auth.current_identity().as_deref(), Some("doctor@example.com"));

        auth.logout().await.unwrap();
        assert!(auth.access_token().await.is_none());
        assert!(auth.current_identity().is_none());
        assert!(matches!(auth.login().await, Err(CollaboratorError::Unauthenticated)));
    }

    #[tokio::test]
    async fn test_blank_token_is_signed_out() {
        let auth = StaticTokenAuth::new(Some("  ".into()), None);
        assert!(auth.access_token().await.is_none());
    }
}
