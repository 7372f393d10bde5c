//! Backend REST API boundary.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::goals::{MacroSetupRequest, MacroTargets};
use crate::session::{RefreshedTokens, SecretString, UserProfile};

pub const NETWORK_ERROR_MESSAGE: &str =
    "Oops! Something went wrong. Please check your internet connection and try again.";
pub const BAD_GATEWAY_MESSAGE: &str = "Unable to connect to server. Please try again later.";
pub const SERVER_UNAVAILABLE_MESSAGE: &str =
    "Server is temporarily unavailable. Please try again later.";
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

/// Backend operations used by the app core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Endpoint {
    Profile,
    MacroSetup,
    Refresh,
    ReferralRedeem,
    ReferralValidate,
    ResetPassword,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl Endpoint {
    pub fn method(&self) -> HttpMethod {
        match self {
            Endpoint::Profile => HttpMethod::Get,
            _ => HttpMethod::Post,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Profile => "/user/me",
            Endpoint::MacroSetup => "/macros/setup",
            Endpoint::Refresh => "/auth/refresh",
            Endpoint::ReferralRedeem => "/referral-code/redeem",
            Endpoint::ReferralValidate => "/referral-code/validate",
            Endpoint::ResetPassword => "/auth/reset-password",
        }
    }

    /// Whether the request carries a bearer token.
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Endpoint::Refresh)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad gateway")]
    BadGateway,

    #[error("server unavailable (status {status})")]
    ServerUnavailable { status: u16 },

    #[error("unauthorized")]
    Unauthorized { detail: Option<String> },

    #[error("forbidden")]
    Forbidden { detail: Option<String> },

    #[error("email verification required")]
    EmailVerificationRequired { detail: String },

    #[error("request rejected (status {status})")]
    Rejected { status: u16, detail: Option<String> },

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("no stored access token")]
    NotAuthenticated,

    #[error("credential storage failed: {0}")]
    Storage(String),
}

impl ApiError {
    /// 401 or 403, the two statuses that trigger a token refresh.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            ApiError::Unauthorized { .. } | ApiError::Forbidden { .. }
        )
    }

    /// Failures where stored credentials should be kept for the next attempt.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ApiError::Network(_)
                | ApiError::BadGateway
                | ApiError::ServerUnavailable { .. }
                | ApiError::Storage(_)
        )
    }

    /// Human-readable message from the response body, when the server sent one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized { detail }
            | ApiError::Forbidden { detail }
            | ApiError::Rejected { detail, .. } => detail.as_deref(),
            ApiError::EmailVerificationRequired { detail } => Some(detail),
            _ => None,
        }
    }

    /// Text for the blocking error dialog.
    pub fn user_message(&self) -> String {
        if let Some(detail) = self.detail() {
            return detail.to_string();
        }
        match self {
            ApiError::Network(_) => NETWORK_ERROR_MESSAGE,
            ApiError::BadGateway => BAD_GATEWAY_MESSAGE,
            ApiError::ServerUnavailable { .. } => SERVER_UNAVAILABLE_MESSAGE,
            _ => GENERIC_ERROR_MESSAGE,
        }
        .to_string()
    }
}

#[async_trait]
pub trait BackendPort: Send + Sync {
    async fn fetch_profile(&self, token: &SecretString) -> Result<UserProfile, ApiError>;

    async fn setup_macros(
        &self,
        token: &SecretString,
        request: &MacroSetupRequest,
    ) -> Result<MacroTargets, ApiError>;

    /// Exchange a refresh token. Sent without a bearer header.
    async fn refresh(&self, refresh_token: &SecretString) -> Result<RefreshedTokens, ApiError>;

    async fn validate_referral(&self, token: &SecretString, code: &str) -> Result<(), ApiError>;

    async fn redeem_referral(&self, token: &SecretString, code: &str) -> Result<(), ApiError>;

    async fn reset_password(
        &self,
        token: &SecretString,
        old_password: &SecretString,
        new_password: &SecretString,
    ) -> Result<(), ApiError>;
}
