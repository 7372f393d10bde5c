//! reqwest-backed implementation of [`BackendPort`].

use std::time::Duration;

use async_trait::async_trait;
use mm_core::goals::{MacroSetupRequest, MacroTargets};
use mm_core::ports::{ApiError, BackendPort, Endpoint, HttpMethod};
use mm_core::session::{RefreshedTokens, SecretString, UserProfile};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::errors;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct HttpBackendConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl HttpBackendConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
struct RefreshBody<'a> {
    refresh_token: &'a str,
}

#[derive(Deserialize)]
struct RefreshResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    user: Option<UserProfile>,
}

#[derive(Serialize)]
struct ReferralBody<'a> {
    referral_code: &'a str,
}

#[derive(Serialize)]
struct ResetPasswordBody<'a> {
    old_password: &'a str,
    new_password: &'a str,
}

impl HttpBackend {
    pub fn new(config: HttpBackendConfig) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {e}"))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    async fn send<B>(
        &self,
        endpoint: Endpoint,
        token: Option<&SecretString>,
        body: Option<&B>,
    ) -> Result<reqwest::Response, ApiError>
    where
        B: Serialize + ?Sized + Sync,
    {
        let url = self.url(endpoint);
        let mut request = match endpoint.method() {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
        };
        if endpoint.requires_auth() {
            if let Some(token) = token {
                request = request.bearer_auth(token.expose());
            }
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        debug!(?endpoint, %url, "Sending backend request");
        let response = request.send().await.map_err(|e| {
            warn!(?endpoint, error = %e, "Backend request failed without response");
            errors::from_transport(e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let error = errors::from_status(status.as_u16(), &body);
        warn!(?endpoint, status = status.as_u16(), error = %error, "Backend request rejected");
        Err(error)
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let bytes = response.bytes().await.map_err(errors::from_transport)?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl BackendPort for HttpBackend {
    async fn fetch_profile(&self, token: &SecretString) -> Result<UserProfile, ApiError> {
        let response = self
            .send::<()>(Endpoint::Profile, Some(token), None)
            .await?;
        Self::decode(response).await
    }

    async fn setup_macros(
        &self,
        token: &SecretString,
        request: &MacroSetupRequest,
    ) -> Result<MacroTargets, ApiError> {
        let response = self
            .send(Endpoint::MacroSetup, Some(token), Some(request))
            .await?;
        Self::decode(response).await
    }

    async fn refresh(&self, refresh_token: &SecretString) -> Result<RefreshedTokens, ApiError> {
        let body = RefreshBody {
            refresh_token: refresh_token.expose(),
        };
        let response = self.send(Endpoint::Refresh, None, Some(&body)).await?;
        let refreshed: RefreshResponse = Self::decode(response).await?;

        let access_token = SecretString::non_blank(refreshed.access_token)
            .ok_or_else(|| ApiError::Decode("refresh response has an empty access_token".into()))?;

        Ok(RefreshedTokens {
            access_token,
            refresh_token: refreshed.refresh_token.and_then(SecretString::non_blank),
            user: refreshed.user,
        })
    }

    async fn validate_referral(&self, token: &SecretString, code: &str) -> Result<(), ApiError> {
        let body = ReferralBody {
            referral_code: code,
        };
        self.send(Endpoint::ReferralValidate, Some(token), Some(&body))
            .await?;
        Ok(())
    }

    async fn redeem_referral(&self, token: &SecretString, code: &str) -> Result<(), ApiError> {
        let body = ReferralBody {
            referral_code: code,
        };
        self.send(Endpoint::ReferralRedeem, Some(token), Some(&body))
            .await?;
        Ok(())
    }

    async fn reset_password(
        &self,
        token: &SecretString,
        old_password: &SecretString,
        new_password: &SecretString,
    ) -> Result<(), ApiError> {
        let body = ResetPasswordBody {
            old_password: old_password.expose(),
            new_password: new_password.expose(),
        };
        self.send(Endpoint::ResetPassword, Some(token), Some(&body))
            .await?;
        Ok(())
    }
}
