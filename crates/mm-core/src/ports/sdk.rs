//! Vendor SDK boundaries touched during bootstrap.
//!
//! Implementations may report the SDK as unavailable; callers treat every error here as
//! recoverable.

use async_trait::async_trait;

#[async_trait]
pub trait CrashReporterPort: Send + Sync {
    fn is_initialized(&self) -> bool;

    async fn initialize(&self) -> anyhow::Result<()>;
}

#[async_trait]
pub trait MapsPort: Send + Sync {
    async fn initialize(&self, api_key: &str) -> anyhow::Result<()>;
}

/// In-app purchases and entitlements.
#[async_trait]
pub trait PurchasesPort: Send + Sync {
    async fn initialize(&self) -> anyhow::Result<()>;

    /// Restore purchases made on another install or before sign-in.
    async fn sync_purchases(&self) -> anyhow::Result<()>;

    async fn set_user_id(&self, user_id: &str) -> anyhow::Result<()>;

    /// `true` when the pro entitlement is active.
    async fn check_entitlement(&self) -> anyhow::Result<bool>;
}

#[async_trait]
pub trait PushNotificationsPort: Send + Sync {
    /// `Ok(false)` when the user denies permission.
    async fn request_permission(&self) -> anyhow::Result<bool>;

    async fn fetch_token(&self) -> anyhow::Result<String>;

    async fn register_token(&self, token: &str) -> anyhow::Result<()>;
}

#[async_trait]
pub trait FontLoaderPort: Send + Sync {
    /// Returns the number of fonts loaded.
    async fn load_fonts(&self) -> anyhow::Result<usize>;
}

#[async_trait]
pub trait SplashScreenPort: Send + Sync {
    async fn hide(&self) -> anyhow::Result<()>;
}
