//! # Pure Data Module / 纯数据模块 - Data Transfer Objects Only
//!
//! ## Responsibilities / 职责
//!
//! - ✅ Define configuration data structures / 定义配置数据结构
//! - ✅ Provide TOML → DTO mapping / 提供 TOML → DTO 的映射
//!
//! ## Prohibited / 禁止事项
//!
//! ❌ **No validation logic / 禁止验证逻辑**
//! ❌ **No default value calculation / 禁止默认值计算**
//!
//! Defaults (request timeout, splash grace delay) are policy and live in the shell wiring.

use std::path::PathBuf;

/// Application configuration DTO (pure data, no logic)
/// 应用配置 DTO（纯数据，无逻辑）
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Backend REST API base URL (may be empty - this is a fact, not an error)
    pub api_base_url: String,

    /// Request timeout in seconds, `0` when not configured
    pub api_timeout_secs: u64,

    /// Maps SDK key
    pub maps_api_key: String,

    /// Crash reporting DSN, empty disables crash reporting
    pub sentry_dsn: String,

    /// `development`, `staging` or `production`
    pub environment: String,

    /// Minimum time the splash stays up after bootstrap settles, `0` when not configured
    pub splash_grace_ms: u64,

    /// Directory holding the durable key-value file
    pub data_dir: PathBuf,

    /// Directory holding bundled font assets
    pub fonts_dir: PathBuf,

    /// Font files expected in `fonts_dir`
    pub font_files: Vec<String>,
}

impl AppConfig {
    /// Create AppConfig from TOML value
    /// 从 TOML 值创建 AppConfig
    ///
    /// **Prohibited / 禁止**: This method must NOT contain any validation
    /// or default value logic. Empty strings are valid "facts".
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        let str_at = |section: &str, key: &str| -> String {
            toml_value
                .get(section)
                .and_then(|s| s.get(key))
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string()
        };
        let uint_at = |section: &str, key: &str| -> u64 {
            toml_value
                .get(section)
                .and_then(|s| s.get(key))
                .and_then(|v| v.as_integer())
                .unwrap_or(0)
                .max(0) as u64
        };

        let font_files = toml_value
            .get("fonts")
            .and_then(|f| f.get("files"))
            .and_then(|v| v.as_array())
            .map(|files| {
                files
                    .iter()
                    .filter_map(|f| f.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            api_base_url: str_at("api", "base_url"),
            api_timeout_secs: uint_at("api", "timeout_secs"),
            maps_api_key: str_at("maps", "api_key"),
            sentry_dsn: str_at("crash_reporting", "sentry_dsn"),
            environment: str_at("general", "environment"),
            splash_grace_ms: uint_at("bootstrap", "splash_grace_ms"),
            data_dir: PathBuf::from(str_at("storage", "data_dir")),
            fonts_dir: PathBuf::from(str_at("fonts", "dir")),
            font_files,
        })
    }

    /// Create empty AppConfig (all empty/default values)
    /// 创建空的 AppConfig（所有字段为空/默认值）
    pub fn empty() -> Self {
        Self {
            api_base_url: String::new(),
            api_timeout_secs: 0,
            maps_api_key: String::new(),
            sentry_dsn: String::new(),
            environment: String::new(),
            splash_grace_ms: 0,
            data_dir: PathBuf::new(),
            fonts_dir: PathBuf::new(),
            font_files: Vec::new(),
        }
    }

    /// Create AppConfig with system-default paths for production use
    ///
    /// The base directory is computed by the caller (e.g. with the `dirs` crate).
    pub fn with_system_defaults(data_dir: PathBuf) -> Self {
        Self {
            fonts_dir: data_dir.join("assets/fonts"),
            data_dir,
            ..Self::empty()
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toml::Value;

    #[test]
    fn from_toml_reads_all_sections() {
        let toml_str = r#"
            [general]
            environment = "staging"

            [api]
            base_url = "https://api.example.test"
            timeout_secs = 15

            [maps]
            api_key = "maps-key"

            [crash_reporting]
            sentry_dsn = "https://key@sentry.example.test/1"

            [bootstrap]
            splash_grace_ms = 1500

            [storage]
            data_dir = "/var/lib/macromeals"

            [fonts]
            dir = "/opt/fonts"
            files = ["Uncut-Sans-Regular.otf", "Uncut-Sans-Bold.otf"]
        "#;
        let value: Value = toml::from_str(toml_str).unwrap();

        let config = AppConfig::from_toml(&value).unwrap();

        assert_eq!(config.api_base_url, "https://api.example.test");
        assert_eq!(config.api_timeout_secs, 15);
        assert_eq!(config.maps_api_key, "maps-key");
        assert_eq!(config.environment, "staging");
        assert_eq!(config.splash_grace_ms, 1500);
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/macromeals"));
        assert_eq!(config.fonts_dir, PathBuf::from("/opt/fonts"));
        assert_eq!(config.font_files.len(), 2);
        assert!(!config.is_production());
    }

    #[test]
    fn from_toml_returns_empty_values_when_missing() {
        let value: Value = toml::from_str("[api]\n").unwrap();

        let config = AppConfig::from_toml(&value).unwrap();

        assert_eq!(config, AppConfig::empty());
    }

    #[test]
    fn negative_numbers_are_clamped_to_zero() {
        let value: Value = toml::from_str("[bootstrap]\nsplash_grace_ms = -5\n").unwrap();

        let config = AppConfig::from_toml(&value).unwrap();

        assert_eq!(config.splash_grace_ms, 0);
    }
}
