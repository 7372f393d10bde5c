use std::sync::Arc;

use mm_core::ports::{KeyValueStorePort, StorageError};
use mm_core::session::credentials::{
    ACCESS_TOKEN_KEY, CREDENTIAL_KEYS, REFRESH_TOKEN_KEY, USER_ID_KEY,
};
use mm_core::session::{RefreshedTokens, SecretString};
use tracing::info;

/// Typed access to the session credentials kept in durable storage.
#[derive(Clone)]
pub struct CredentialStore {
    storage: Arc<dyn KeyValueStorePort>,
}

impl CredentialStore {
    pub fn new(storage: Arc<dyn KeyValueStorePort>) -> Self {
        Self { storage }
    }

    pub async fn access_token(&self) -> Result<Option<SecretString>, StorageError> {
        Ok(self
            .storage
            .get(ACCESS_TOKEN_KEY)
            .await?
            .and_then(SecretString::non_blank))
    }

    pub async fn refresh_token(&self) -> Result<Option<SecretString>, StorageError> {
        Ok(self
            .storage
            .get(REFRESH_TOKEN_KEY)
            .await?
            .and_then(SecretString::non_blank))
    }

    pub async fn user_id(&self) -> Result<Option<String>, StorageError> {
        Ok(self
            .storage
            .get(USER_ID_KEY)
            .await?
            .filter(|id| !id.trim().is_empty()))
    }

    pub async fn store_user_id(&self, user_id: &str) -> Result<(), StorageError> {
        self.storage.set(USER_ID_KEY, user_id).await
    }

    /// Persist the result of a token refresh. The refresh token and user id are only
    /// overwritten when the response carries them.
    pub async fn store_refreshed(&self, tokens: &RefreshedTokens) -> Result<(), StorageError> {
        self.storage
            .set(ACCESS_TOKEN_KEY, tokens.access_token.expose())
            .await?;
        if let Some(refresh_token) = &tokens.refresh_token {
            self.storage
                .set(REFRESH_TOKEN_KEY, refresh_token.expose())
                .await?;
        }
        if let Some(user) = &tokens.user {
            self.store_user_id(&user.id).await?;
        }
        Ok(())
    }

    /// Remove access token, refresh token and user id.
    pub async fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove_many(&CREDENTIAL_KEYS).await?;
        info!("Session credentials cleared");
        Ok(())
    }
}
