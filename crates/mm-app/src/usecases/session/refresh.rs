//! Single-retry token refresh around authenticated backend calls.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;

use mm_core::ports::{ApiError, BackendPort, Endpoint, KeyValueStorePort};
use mm_core::session::SecretString;
use tracing::{info, info_span, warn, Instrument};

use super::credentials::CredentialStore;

/// Endpoints where a 401/403 must not trigger a refresh.
#[derive(Debug, Clone)]
pub struct RefreshPolicy {
    exempt: HashSet<Endpoint>,
}

impl Default for RefreshPolicy {
    /// A 401 from reset-password means "wrong old password", not an expired token.
    fn default() -> Self {
        Self::with_exempt([Endpoint::ResetPassword])
    }
}

impl RefreshPolicy {
    pub fn with_exempt(exempt: impl IntoIterator<Item = Endpoint>) -> Self {
        Self {
            exempt: exempt.into_iter().collect(),
        }
    }

    pub fn should_refresh(&self, endpoint: Endpoint, error: &ApiError) -> bool {
        endpoint.requires_auth() && !self.exempt.contains(&endpoint) && error.is_auth_failure()
    }
}

/// Runs backend calls with the stored access token, refreshing it once on 401/403.
pub struct AuthenticatedCaller {
    backend: Arc<dyn BackendPort>,
    credentials: CredentialStore,
    policy: RefreshPolicy,
}

fn storage_error(err: mm_core::ports::StorageError) -> ApiError {
    ApiError::Storage(err.to_string())
}

impl AuthenticatedCaller {
    pub fn new(backend: Arc<dyn BackendPort>, storage: Arc<dyn KeyValueStorePort>) -> Self {
        Self::with_policy(backend, storage, RefreshPolicy::default())
    }

    pub fn with_policy(
        backend: Arc<dyn BackendPort>,
        storage: Arc<dyn KeyValueStorePort>,
        policy: RefreshPolicy,
    ) -> Self {
        Self {
            backend,
            credentials: CredentialStore::new(storage),
            policy,
        }
    }

    pub fn backend(&self) -> Arc<dyn BackendPort> {
        Arc::clone(&self.backend)
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// Invoke `op` with the stored access token.
    ///
    /// On an auth failure the token is refreshed and `op` is retried exactly once. The
    /// retry's result is returned unchanged, so a second 401 reaches the caller.
    pub async fn call<T, F, Fut>(&self, endpoint: Endpoint, op: F) -> Result<T, ApiError>
    where
        F: Fn(SecretString) -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let token = self
            .credentials
            .access_token()
            .await
            .map_err(storage_error)?
            .ok_or(ApiError::NotAuthenticated)?;

        let error = match op(token).await {
            Ok(value) => return Ok(value),
            Err(error) => error,
        };

        if !self.policy.should_refresh(endpoint, &error) {
            return Err(error);
        }

        let span = info_span!("usecase.authenticated_caller.refresh", ?endpoint);
        let fresh_token = self.refresh(error).instrument(span).await?;
        op(fresh_token).await
    }

    async fn refresh(&self, original: ApiError) -> Result<SecretString, ApiError> {
        let Some(refresh_token) = self.credentials.refresh_token().await.map_err(storage_error)?
        else {
            warn!("Access token rejected and no refresh token stored");
            self.clear_credentials().await;
            return Err(original);
        };

        info!("Access token rejected, refreshing");
        match self.backend.refresh(&refresh_token).await {
            Ok(tokens) => {
                self.credentials
                    .store_refreshed(&tokens)
                    .await
                    .map_err(storage_error)?;
                info!("Token refreshed");
                Ok(tokens.access_token)
            }
            Err(err) if err.is_transient() => {
                warn!(error = %err, "Token refresh failed, keeping credentials for a later retry");
                Err(err)
            }
            Err(err) => {
                warn!(error = %err, "Token refresh rejected");
                self.clear_credentials().await;
                Err(err)
            }
        }
    }

    async fn clear_credentials(&self) {
        if let Err(err) = self.credentials.clear().await {
            warn!(error = %err, "Failed to clear credentials");
        }
    }
}
