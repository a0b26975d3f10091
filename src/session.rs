use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::catalog::{AdminProfile, CatalogClient, Credentials, GatewayError};
use crate::storage::{KeyValueStore, StorageError, REMEMBERED_USERNAME_KEY, TOKEN_KEY};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Login failed: {0}")]
    Login(#[from] GatewayError),
    #[error("Session storage failed: {0}")]
    Storage(#[from] StorageError),
}

/// Admin session kept in the keyed store: an opaque token and, optionally,
/// the username to prefill on the next login.
#[derive(Clone)]
pub struct Session {
    storage: Arc<dyn KeyValueStore>,
}

impl Session {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    pub async fn token(&self) -> Result<Option<String>, SessionError> {
        Ok(self.storage.get(TOKEN_KEY).await?)
    }

    pub async fn save_token(&self, token: &str) -> Result<(), SessionError> {
        Ok(self.storage.set(TOKEN_KEY, token).await?)
    }

    /// A token being present is all that is checked.
    pub async fn is_authenticated(&self) -> bool {
        match self.token().await {
            Ok(token) => token.is_some_and(|token| !token.is_empty()),
            Err(err) => {
                warn!(error = %err, "Failed to read session token");
                false
            }
        }
    }

    pub async fn remembered_username(&self) -> Result<Option<String>, SessionError> {
        Ok(self.storage.get(REMEMBERED_USERNAME_KEY).await?)
    }

    pub async fn login(
        &self,
        client: &CatalogClient,
        username: &str,
        password: &str,
        remember: bool,
    ) -> Result<AdminProfile, SessionError> {
        let profile = client.login(&Credentials::new(username, password)).await?;
        self.save_token(&profile.access_token).await?;

        if remember {
            self.storage.set(REMEMBERED_USERNAME_KEY, username).await?;
        } else {
            self.storage.remove(REMEMBERED_USERNAME_KEY).await?;
        }
        info!(username, "Admin logged in");
        Ok(profile)
    }

    pub async fn logout(&self) -> Result<(), SessionError> {
        self.storage.remove(TOKEN_KEY).await?;
        info!("Admin logged out");
        Ok(())
    }
}
