//! Port doubles shared by the unit tests in this crate.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mm_core::goals::{MacroSetupRequest, MacroTargets};
use mm_core::ports::{
    ApiError, BackendPort, ClockPort, CrashReporterPort, DialogPort, Endpoint, FontLoaderPort,
    KeyValueStorePort, MapsPort, PurchasesPort, PushNotificationsPort, SplashScreenPort,
};
use mm_core::session::credentials::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_ID_KEY};
use mm_core::session::{RefreshedTokens, SecretString, UserProfile};
use mm_infra::InMemoryKeyValueStore;

mockall::mock! {
    pub Purchases {}

    #[async_trait]
    impl PurchasesPort for Purchases {
        async fn initialize(&self) -> anyhow::Result<()>;
        async fn sync_purchases(&self) -> anyhow::Result<()>;
        async fn set_user_id(&self, user_id: &str) -> anyhow::Result<()>;
        async fn check_entitlement(&self) -> anyhow::Result<bool>;
    }
}

mockall::mock! {
    pub CrashReporter {}

    #[async_trait]
    impl CrashReporterPort for CrashReporter {
        fn is_initialized(&self) -> bool;
        async fn initialize(&self) -> anyhow::Result<()>;
    }
}

mockall::mock! {
    pub Maps {}

    #[async_trait]
    impl MapsPort for Maps {
        async fn initialize(&self, api_key: &str) -> anyhow::Result<()>;
    }
}

mockall::mock! {
    pub Push {}

    #[async_trait]
    impl PushNotificationsPort for Push {
        async fn request_permission(&self) -> anyhow::Result<bool>;
        async fn fetch_token(&self) -> anyhow::Result<String>;
        async fn register_token(&self, token: &str) -> anyhow::Result<()>;
    }
}

mockall::mock! {
    pub Fonts {}

    #[async_trait]
    impl FontLoaderPort for Fonts {
        async fn load_fonts(&self) -> anyhow::Result<usize>;
    }
}

mockall::mock! {
    pub Splash {}

    #[async_trait]
    impl SplashScreenPort for Splash {
        async fn hide(&self) -> anyhow::Result<()>;
    }
}

mockall::mock! {
    pub Dialog {}

    #[async_trait]
    impl DialogPort for Dialog {
        async fn confirm(&self, title: &str, message: &str) -> bool;
        async fn alert(&self, title: &str, message: &str);
    }
}

pub struct FixedClock(pub i64);

impl ClockPort for FixedClock {
    fn now_ms(&self) -> i64 {
        self.0
    }
}

/// 2024-06-14T12:00:00Z
pub const JUNE_14_2024_MS: i64 = 1_718_366_400_000;

/// Scripted backend. Each call pops the next queued result for its endpoint and
/// records the token it was sent with.
#[derive(Default)]
pub struct FakeBackend {
    profiles: Mutex<VecDeque<Result<UserProfile, ApiError>>>,
    refreshes: Mutex<VecDeque<Result<RefreshedTokens, ApiError>>>,
    macros: Mutex<VecDeque<Result<MacroTargets, ApiError>>>,
    validations: Mutex<VecDeque<Result<(), ApiError>>>,
    redemptions: Mutex<VecDeque<Result<(), ApiError>>>,
    calls: Mutex<Vec<(Endpoint, String)>>,
}

fn pop<T>(queue: &Mutex<VecDeque<Result<T, ApiError>>>) -> Result<T, ApiError> {
    queue
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| Err(ApiError::Network("no scripted response".into())))
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_profile(&self, result: Result<UserProfile, ApiError>) {
        self.profiles.lock().unwrap().push_back(result);
    }

    pub fn push_refresh(&self, result: Result<RefreshedTokens, ApiError>) {
        self.refreshes.lock().unwrap().push_back(result);
    }

    pub fn push_macros(&self, result: Result<MacroTargets, ApiError>) {
        self.macros.lock().unwrap().push_back(result);
    }

    pub fn push_validation(&self, result: Result<(), ApiError>) {
        self.validations.lock().unwrap().push_back(result);
    }

    pub fn push_redemption(&self, result: Result<(), ApiError>) {
        self.redemptions.lock().unwrap().push_back(result);
    }

    pub fn calls(&self) -> Vec<(Endpoint, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, endpoint: Endpoint) -> usize {
        self.calls().iter().filter(|(e, _)| *e == endpoint).count()
    }

    fn record(&self, endpoint: Endpoint, token: &SecretString) {
        self.calls
            .lock()
            .unwrap()
            .push((endpoint, token.expose().to_string()));
    }
}

#[async_trait]
impl BackendPort for FakeBackend {
    async fn fetch_profile(&self, token: &SecretString) -> Result<UserProfile, ApiError> {
        self.record(Endpoint::Profile, token);
        pop(&self.profiles)
    }

    async fn setup_macros(
        &self,
        token: &SecretString,
        _request: &MacroSetupRequest,
    ) -> Result<MacroTargets, ApiError> {
        self.record(Endpoint::MacroSetup, token);
        pop(&self.macros)
    }

    async fn refresh(&self, refresh_token: &SecretString) -> Result<RefreshedTokens, ApiError> {
        self.record(Endpoint::Refresh, refresh_token);
        pop(&self.refreshes)
    }

    async fn validate_referral(&self, token: &SecretString, _code: &str) -> Result<(), ApiError> {
        self.record(Endpoint::ReferralValidate, token);
        pop(&self.validations)
    }

    async fn redeem_referral(&self, token: &SecretString, _code: &str) -> Result<(), ApiError> {
        self.record(Endpoint::ReferralRedeem, token);
        pop(&self.redemptions)
    }

    async fn reset_password(
        &self,
        token: &SecretString,
        _old_password: &SecretString,
        _new_password: &SecretString,
    ) -> Result<(), ApiError> {
        self.record(Endpoint::ResetPassword, token);
        Err(ApiError::Unauthorized {
            detail: Some("Old password is incorrect".into()),
        })
    }
}

pub fn profile(id: &str) -> UserProfile {
    UserProfile {
        id: id.into(),
        email: format!("{id}@example.test"),
        ..Default::default()
    }
}

pub fn unauthorized() -> ApiError {
    ApiError::Unauthorized { detail: None }
}

pub fn refreshed(access: &str, refresh: Option<&str>) -> RefreshedTokens {
    RefreshedTokens {
        access_token: SecretString::new(access),
        refresh_token: refresh.map(SecretString::new),
        user: None,
    }
}

/// Storage pre-populated with a signed-in user's credentials.
pub fn signed_in_storage() -> Arc<InMemoryKeyValueStore> {
    Arc::new(InMemoryKeyValueStore::with_entries([
        (ACCESS_TOKEN_KEY, "access-1"),
        (REFRESH_TOKEN_KEY, "refresh-1"),
        (USER_ID_KEY, "u-1"),
    ]))
}

pub async fn stored(storage: &dyn KeyValueStorePort, key: &str) -> Option<String> {
    storage.get(key).await.unwrap()
}
