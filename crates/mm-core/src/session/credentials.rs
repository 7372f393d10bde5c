//! Durable storage keys and token models.

use super::profile::UserProfile;
use super::secret::SecretString;

pub const ACCESS_TOKEN_KEY: &str = "my_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
pub const USER_ID_KEY: &str = "user_id";
pub const ONBOARDING_COMPLETED_KEY: &str = "isOnboardingCompleted";
pub const PURCHASES_SYNCED_KEY: &str = "has_synced_purchases";

/// Keys removed on logout.
pub const CREDENTIAL_KEYS: [&str; 3] = [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_ID_KEY];

/// Booleans are stored as the strings `"true"` / `"false"`.
pub fn stored_flag(value: Option<&str>) -> bool {
    value == Some("true")
}

pub fn flag_value(flag: bool) -> &'static str {
    if flag {
        "true"
    } else {
        "false"
    }
}

/// Result of a successful `POST /auth/refresh`.
#[derive(Debug)]
pub struct RefreshedTokens {
    pub access_token: SecretString,
    /// Absent when the backend keeps the current refresh token.
    pub refresh_token: Option<SecretString>,
    pub user: Option<UserProfile>,
}
