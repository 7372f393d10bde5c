//! # Dependency Injection / 依赖注入模块
//!
//! ## Responsibilities / 职责
//!
//! - ✅ Create infra implementations (HTTP backend, storage, crash reporting) / 创建 infra 层具体实现
//! - ✅ Create shell adapters (dialogs, splash, unavailable SDKs) / 创建外壳适配器
//! - ✅ Inject all dependencies into the use cases / 将所有依赖注入到用例
//!
//! ## Prohibited / 禁止事项
//!
//! ❌ **No business logic / 禁止包含任何业务逻辑**
//!
//! ## Architecture Principle / 架构原则
//!
//! > **This is the only place allowed to depend on mm-infra + mm-app simultaneously.**
//! > **这是唯一允许同时依赖 mm-infra 和 mm-app 的地方。**

use std::sync::Arc;
use std::time::Duration;

use mm_app::{
    AuthenticatedCaller, BootstrapDeps, BootstrapSequencer, BootstrapSettings, CompleteGoalSetup,
    GoalWizardOrchestrator, RedeemReferralCode, ResolveEntitlement, SessionStore,
    ValidateSession,
};
use mm_core::config::AppConfig;
use mm_core::ports::{KeyValueStorePort, PurchasesPort};
use mm_infra::http::DEFAULT_TIMEOUT;
use mm_infra::{
    FileFontLoader, FileKeyValueStore, HttpBackend, HttpBackendConfig, SentryCrashReporter,
    SystemClock,
};
use tracing::info;

use crate::adapters::{
    HeadlessPush, LoggingDialog, LoggingSplash, UnavailableMaps, UnavailablePurchases,
};

/// Result type for wiring operations
pub type WiringResult<T> = Result<T, WiringError>;

/// Errors during dependency injection
/// 依赖注入错误（基础设施初始化失败）
#[derive(Debug, thiserror::Error)]
pub enum WiringError {
    #[error("API base URL is not configured")]
    MissingApiBaseUrl,

    #[error("HTTP client initialization failed: {0}")]
    HttpClientInit(String),

    #[error("Data directory initialization failed: {0}")]
    DataDirInit(String),
}

/// Fully assembled use cases, shared by the shell for the lifetime of the process.
pub struct AppServices {
    pub session: Arc<SessionStore>,
    pub bootstrap: BootstrapSequencer,
    pub goal_wizard: GoalWizardOrchestrator,
    pub complete_goal_setup: CompleteGoalSetup,
    pub redeem_referral: RedeemReferralCode,
    /// Non-production builds may skip the paywall after goal setup.
    pub dev_mode: bool,
}

fn request_timeout(config: &AppConfig) -> Duration {
    match config.api_timeout_secs {
        0 => DEFAULT_TIMEOUT,
        secs => Duration::from_secs(secs),
    }
}

fn bootstrap_settings(config: &AppConfig) -> BootstrapSettings {
    let defaults = BootstrapSettings::default();
    BootstrapSettings {
        maps_api_key: config.maps_api_key.clone(),
        splash_grace: match config.splash_grace_ms {
            0 => defaults.splash_grace,
            ms => Duration::from_millis(ms),
        },
    }
}

/// Wire every port to its adapter and build the use cases.
/// 将所有端口连接到适配器并构建用例。
///
/// # Errors / 错误
///
/// - `MissingApiBaseUrl` when no backend is configured
/// - `HttpClientInit` if the HTTP client cannot be built
/// - `DataDirInit` if the data directory cannot be created
pub fn wire_dependencies(config: &AppConfig) -> WiringResult<AppServices> {
    if config.api_base_url.trim().is_empty() {
        return Err(WiringError::MissingApiBaseUrl);
    }

    std::fs::create_dir_all(&config.data_dir).map_err(|e| {
        WiringError::DataDirInit(format!(
            "Failed to create {}: {}",
            config.data_dir.display(),
            e
        ))
    })?;

    let backend = HttpBackend::new(HttpBackendConfig {
        base_url: config.api_base_url.clone(),
        timeout: request_timeout(config),
    })
    .map_err(|e| WiringError::HttpClientInit(e.to_string()))?;

    let storage: Arc<dyn KeyValueStorePort> =
        Arc::new(FileKeyValueStore::with_defaults(&config.data_dir));
    let purchases: Arc<dyn PurchasesPort> = Arc::new(UnavailablePurchases);
    let session = Arc::new(SessionStore::new());
    let caller = Arc::new(AuthenticatedCaller::new(Arc::new(backend), storage.clone()));

    let bootstrap = BootstrapSequencer::new(
        BootstrapDeps {
            crash_reporter: Arc::new(SentryCrashReporter::new(
                config.sentry_dsn.clone(),
                config.environment.clone(),
            )),
            maps: Arc::new(UnavailableMaps),
            purchases: purchases.clone(),
            push: Arc::new(HeadlessPush),
            fonts: Arc::new(FileFontLoader::new(
                config.fonts_dir.clone(),
                config.font_files.clone(),
            )),
            splash: Arc::new(LoggingSplash),
            storage,
            validate_session: Arc::new(ValidateSession::new(caller.clone())),
            entitlement: Arc::new(ResolveEntitlement::new(purchases.clone())),
            session: session.clone(),
        },
        bootstrap_settings(config),
    );

    let goal_wizard = GoalWizardOrchestrator::new(
        caller.clone(),
        Arc::new(LoggingDialog),
        Arc::new(SystemClock),
    );
    let complete_goal_setup = CompleteGoalSetup::new(caller.clone(), purchases, session.clone());
    let redeem_referral = RedeemReferralCode::new(caller, session.clone());

    info!(
        api_base_url = %config.api_base_url,
        data_dir = %config.data_dir.display(),
        "Dependencies wired"
    );

    Ok(AppServices {
        session,
        bootstrap,
        goal_wizard,
        complete_goal_setup,
        redeem_referral,
        dev_mode: !config.is_production(),
    })
}
