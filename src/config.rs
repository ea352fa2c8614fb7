use crate::news::Provider;
use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{env, fs, path::PathBuf};

/// On-disk shape: everything optional, defaults filled per provider.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub provider: Option<String>,
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub default_query: Option<String>,
    pub debounce_ms: Option<u64>,
    pub result_limit: Option<u32>,
    pub language: Option<String>,
    pub open_command: Option<String>,
    pub header: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub provider: Provider,
    pub endpoint: String,
    pub api_key: String,
    pub default_query: String,
    pub debounce: Duration,
    pub result_limit: u32,
    pub language: String,
    pub open_command: Option<String>,
    pub header: Option<String>,
}

/// Env var consulted before the config file for the provider credential.
/// The key never lives in source.
pub const API_KEY_ENV: &str = "NEWS_API_KEY";

pub fn load(config_override: Option<String>) -> Result<RuntimeConfig> {
    // An explicit --config that does not exist is an error; a missing
    // default path just means defaults.
    if let Some(path_str) = config_override {
        let p = PathBuf::from(&path_str);
        if !p.is_file() {
            return Err(anyhow!("config file not found: {}", path_str));
        }
        return resolve(read_config(&p)?);
    }

    if let Some(path) = default_config_path() {
        if path.is_file() {
            return resolve(read_config(&path)?);
        }
    }

    resolve(AppConfig::default())
}

fn read_config(path: &PathBuf) -> Result<AppConfig> {
    let txt = fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    toml::from_str(&txt).with_context(|| format!("failed to parse toml: {}", path.display()))
}

fn resolve(cfg: AppConfig) -> Result<RuntimeConfig> {
    let provider = match cfg.provider.as_deref() {
        Some(name) => Provider::from_name(name)?,
        None => Provider::GNews,
    };

    let api_key = env::var(API_KEY_ENV)
        .ok()
        .filter(|k| !k.trim().is_empty())
        .or(cfg.api_key)
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| {
            anyhow!(
                "no API key configured; set {} or add api_key to the config file",
                API_KEY_ENV
            )
        })?;

    Ok(RuntimeConfig {
        provider,
        endpoint: cfg
            .endpoint
            .unwrap_or_else(|| provider.default_endpoint().to_string()),
        api_key,
        default_query: cfg
            .default_query
            .unwrap_or_else(|| provider.default_query().to_string()),
        debounce: Duration::from_millis(cfg.debounce_ms.unwrap_or(500)),
        result_limit: cfg.result_limit.unwrap_or(10),
        language: cfg.language.unwrap_or_else(|| "en".to_string()),
        open_command: cfg.open_command,
        header: cfg.header,
    })
}

fn default_config_path() -> Option<PathBuf> {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        let mut p = PathBuf::from(xdg);
        p.push("news-search");
        p.push("config.toml");
        return Some(p);
    }
    if let Ok(home) = env::var("HOME") {
        let mut p = PathBuf::from(home);
        p.push(".config");
        p.push("news-search");
        p.push("config.toml");
        return Some(p);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_in_per_provider() {
        let cfg = resolve(AppConfig {
            api_key: Some("k".into()),
            ..AppConfig::default()
        })
        .unwrap();
        assert_eq!(cfg.provider, Provider::GNews);
        assert_eq!(cfg.endpoint, "https://gnews.io/api/v4/search");
        assert_eq!(cfg.default_query, "soccer");
        assert_eq!(cfg.debounce, Duration::from_millis(500));
        assert_eq!(cfg.result_limit, 10);
        assert_eq!(cfg.language, "en");
    }

    #[test]
    fn newsapi_provider_switches_defaults() {
        let cfg = resolve(AppConfig {
            provider: Some("newsapi".into()),
            api_key: Some("k".into()),
            ..AppConfig::default()
        })
        .unwrap();
        assert_eq!(cfg.provider, Provider::NewsApi);
        assert_eq!(cfg.endpoint, "https://newsapi.org/v2/everything");
        assert_eq!(cfg.default_query, "latest soccer");
    }

    #[test]
    fn missing_api_key_is_a_startup_error() {
        // Only meaningful when the env var is not set in the test environment
        if env::var(API_KEY_ENV).is_ok() {
            return;
        }
        let err = resolve(AppConfig::default()).unwrap_err();
        assert!(err.to_string().contains(API_KEY_ENV));
    }

    #[test]
    fn explicit_settings_win_over_defaults() {
        let cfg = resolve(AppConfig {
            api_key: Some("k".into()),
            endpoint: Some("https://proxy.internal/search".into()),
            default_query: Some("markets".into()),
            debounce_ms: Some(250),
            result_limit: Some(5),
            language: Some("fr".into()),
            ..AppConfig::default()
        })
        .unwrap();
        assert_eq!(cfg.endpoint, "https://proxy.internal/search");
        assert_eq!(cfg.default_query, "markets");
        assert_eq!(cfg.debounce, Duration::from_millis(250));
        assert_eq!(cfg.result_limit, 5);
        assert_eq!(cfg.language, "fr");
    }

    #[test]
    fn unknown_provider_name_is_rejected() {
        let err = resolve(AppConfig {
            provider: Some("reuters-direct".into()),
            api_key: Some("k".into()),
            ..AppConfig::default()
        })
        .unwrap_err();
        assert!(err.to_string().contains("unknown provider"));
    }
}
