//! # Configuration Loader / 配置加载器
//!
//! ## Responsibilities / 职责
//!
//! - ✅ Locate and read the TOML configuration file / 定位并读取 TOML 配置文件
//! - ✅ Parse TOML into the AppConfig DTO / 将 TOML 解析为 AppConfig DTO
//! - ✅ Apply environment variable overrides / 应用环境变量覆盖
//!
//! ## Prohibited / 禁止事项
//!
//! ❌ **No validation logic / 禁止验证逻辑**
//!
//! Only path defaults are resolved here. Timeouts and delays are defaulted in `wiring.rs`.

use std::path::{Path, PathBuf};

use anyhow::Context;
use mm_core::config::AppConfig;
use tracing::debug;

pub const CONFIG_PATH_ENV: &str = "MACROMEALS_CONFIG";
pub const CONFIG_FILE_NAME: &str = "macromeals.toml";
const APP_DIR_NAME: &str = "macromeals";

/// Environment variables that win over the file, and the field each one sets.
const ENV_OVERRIDES: [(&str, fn(&mut AppConfig, String)); 4] = [
    ("API_BASE_URL", |c, v| c.api_base_url = v),
    ("GOOGLE_MAPS_API_KEY", |c, v| c.maps_api_key = v),
    ("SENTRY_DSN", |c, v| c.sentry_dsn = v),
    ("ENVIRONMENT", |c, v| c.environment = v),
];

/// Load configuration from a TOML file
/// 从 TOML 文件加载配置
///
/// Pure data loading: missing sections become empty values.
///
/// # Errors / 错误
///
/// Returns error if the file cannot be read or is not valid TOML.
pub fn load_config(config_path: &Path) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    AppConfig::from_toml(&toml_value)
}

/// `$MACROMEALS_CONFIG`, else `<platform config dir>/macromeals/macromeals.toml`.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Per-user data directory used when the file does not name one.
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
}

/// Override file values with non-empty variables from `lookup`.
pub fn apply_env_overrides(config: &mut AppConfig, lookup: impl Fn(&str) -> Option<String>) {
    for (name, set) in ENV_OVERRIDES {
        if let Some(value) = lookup(name).filter(|v| !v.trim().is_empty()) {
            debug!(variable = name, "Config value overridden from environment");
            set(config, value);
        }
    }
}

/// Read the config file when it exists, then apply process environment overrides.
///
/// A missing file is not an error: the app runs from system defaults plus environment.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let mut config = match resolve_config_path().filter(|path| path.exists()) {
        Some(path) => load_config(&path)?,
        None => AppConfig::with_system_defaults(default_data_dir()),
    };
    if config.data_dir.as_os_str().is_empty() {
        config.data_dir = default_data_dir();
    }
    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    Ok(config)
}

/// Load `.env` from the working directory or its ancestors.
///
/// A missing file is fine. A file that exists but cannot be parsed is reported.
pub fn load_dotenv() -> Result<(), dotenvy::Error> {
    ignore_missing_dotenv(dotenvy::dotenv().map(|_| ()))
}

/// Same as [`load_dotenv`] for an explicit path.
pub fn load_dotenv_from(path: &Path) -> Result<(), dotenvy::Error> {
    ignore_missing_dotenv(dotenvy::from_path(path))
}

fn ignore_missing_dotenv(result: Result<(), dotenvy::Error>) -> Result<(), dotenvy::Error> {
    match result {
        Err(dotenvy::Error::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
