//! Session state and validation result.

use serde::{Deserialize, Serialize};

use super::profile::UserProfile;

/// Application-wide session state.
///
/// 应用级会话状态。只通过 `SessionStore` 修改。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionState {
    pub authenticated: bool,
    pub user_id: Option<String>,
    pub profile: Option<UserProfile>,
    pub has_macros: bool,
    pub is_pro: bool,
    pub ready_for_dashboard: bool,
    pub is_session_validated: bool,
    pub is_onboarding_completed: bool,
}

/// Output of session validation at cold start.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionValidation {
    pub is_valid: bool,
    /// Profile has computed macros.
    pub is_complete: bool,
    pub user: Option<UserProfile>,
    pub error: Option<String>,
}

impl SessionValidation {
    /// No stored access token.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn valid(user: UserProfile) -> Self {
        Self {
            is_valid: true,
            is_complete: user.has_macros,
            user: Some(user),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }
}
