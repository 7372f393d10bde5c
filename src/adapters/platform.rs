//! Headless platform adapters
//! 无界面平台适配器
//!
//! The desktop shell has no maps, store or push SDK. These adapters report the SDK as
//! unavailable so the bootstrap records the step as failed or skipped and keeps going.

use async_trait::async_trait;
use mm_core::ports::{
    DialogPort, MapsPort, PurchasesPort, PushNotificationsPort, SplashScreenPort,
};
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
#[error("{0} SDK is not available on this platform")]
pub struct SdkUnavailable(pub &'static str);

#[derive(Debug, Clone, Default)]
pub struct UnavailableMaps;

#[async_trait]
impl MapsPort for UnavailableMaps {
    async fn initialize(&self, _api_key: &str) -> anyhow::Result<()> {
        Err(SdkUnavailable("Maps").into())
    }
}

/// No store on this platform, so no entitlement is ever active.
#[derive(Debug, Clone, Default)]
pub struct UnavailablePurchases;

#[async_trait]
impl PurchasesPort for UnavailablePurchases {
    async fn initialize(&self) -> anyhow::Result<()> {
        Err(SdkUnavailable("Purchases").into())
    }

    async fn sync_purchases(&self) -> anyhow::Result<()> {
        Err(SdkUnavailable("Purchases").into())
    }

    async fn set_user_id(&self, _user_id: &str) -> anyhow::Result<()> {
        Err(SdkUnavailable("Purchases").into())
    }

    async fn check_entitlement(&self) -> anyhow::Result<bool> {
        Err(SdkUnavailable("Purchases").into())
    }
}

/// Behaves like a user who declined notifications.
#[derive(Debug, Clone, Default)]
pub struct HeadlessPush;

#[async_trait]
impl PushNotificationsPort for HeadlessPush {
    async fn request_permission(&self) -> anyhow::Result<bool> {
        Ok(false)
    }

    async fn fetch_token(&self) -> anyhow::Result<String> {
        Err(SdkUnavailable("Push notifications").into())
    }

    async fn register_token(&self, _token: &str) -> anyhow::Result<()> {
        Err(SdkUnavailable("Push notifications").into())
    }
}

/// Writes prompts to the log. Confirmations are always declined.
#[derive(Debug, Clone, Default)]
pub struct LoggingDialog;

#[async_trait]
impl DialogPort for LoggingDialog {
    async fn confirm(&self, title: &str, message: &str) -> bool {
        info!(title, message, "Confirmation requested, declining without a UI");
        false
    }

    async fn alert(&self, title: &str, message: &str) {
        warn!(title, message, "Alert");
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoggingSplash;

#[async_trait]
impl SplashScreenPort for LoggingSplash {
    async fn hide(&self) -> anyhow::Result<()> {
        info!("Splash screen hidden");
        Ok(())
    }
}
