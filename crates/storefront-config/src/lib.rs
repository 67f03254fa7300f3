//! Shared configuration for the storefront CLI.
//!
//! TOML profiles merged from defaults, the config file and `STOREFRONT_`
//! environment variables, and translation to `storefront_core::StoreConfig`.
//! The CLI layers its global flags on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use storefront_core::{DEFAULT_API_URL, StoreConfig, TlsVerification};

/// Overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "STOREFRONT_CONFIG";

pub const DEFAULT_PROFILE: &str = "default";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named API profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some(DEFAULT_PROFILE.into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Resolve the active profile name: explicit flag, then the configured
    /// default, then `"default"`.
    pub fn active_profile_name(&self, flag: Option<&str>) -> String {
        flag.map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| DEFAULT_PROFILE.into())
    }

    /// Comma-separated profile names, or `(none)`.
    pub fn available_profiles(&self) -> String {
        if self.profiles.is_empty() {
            "(none)".into()
        } else {
            self.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_api_url() -> String {
    DEFAULT_API_URL.into()
}

/// A named API profile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// Product API root (e.g., "https://fakestoreapi.com").
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Path to a custom CA certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,

    /// Override the default request timeout (seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    /// How long success confirmations stay up (milliseconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmation_delay_ms: Option<u64>,

    /// Not-found countdown before redirecting home (seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_countdown_secs: Option<u64>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            ca_cert: None,
            timeout: None,
            confirmation_delay_ms: None,
            redirect_countdown_secs: None,
        }
    }
}

impl Profile {
    pub fn for_url(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ..Self::default()
        }
    }

    /// Set one field from its `config set` key.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "api_url" | "api-url" => {
                parse_url(value)?;
                self.api_url = value.into();
            }
            "ca_cert" | "ca-cert" => self.ca_cert = Some(value.into()),
            "timeout" => self.timeout = Some(parse_number("timeout", value)?),
            "confirmation_delay_ms" | "confirmation-delay-ms" => {
                self.confirmation_delay_ms = Some(parse_number("confirmation_delay_ms", value)?);
            }
            "redirect_countdown_secs" | "redirect-countdown-secs" => {
                self.redirect_countdown_secs =
                    Some(parse_number("redirect_countdown_secs", value)?);
            }
            other => {
                return Err(ConfigError::Validation {
                    field: other.into(),
                    reason: format!(
                        "unknown config key '{other}'. Valid keys: api_url, ca_cert, timeout, \
                         confirmation_delay_ms, redirect_countdown_secs"
                    ),
                });
            }
        }
        Ok(())
    }
}

fn parse_number(field: &str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Validation {
        field: field.into(),
        reason: format!("expected a whole number, got '{value}'"),
    })
}

fn parse_url(raw: &str) -> Result<url::Url, ConfigError> {
    raw.parse().map_err(|_| ConfigError::Validation {
        field: "api_url".into(),
        reason: format!("invalid URL: {raw}"),
    })
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path: `STOREFRONT_CONFIG`, then platform
/// conventions.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }
    ProjectDirs::from("com", "storefront", "storefront").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("storefront");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file, still layering `STOREFRONT_` env vars.
/// A missing file yields the defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("STOREFRONT_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if it can't be read.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

/// Build a `StoreConfig` from a profile and the global defaults.
pub fn profile_to_store_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<StoreConfig, ConfigError> {
    let url = parse_url(&profile.api_url)?;
    let mut store = StoreConfig::new(url);

    store.tls = profile
        .ca_cert
        .clone()
        .map_or(TlsVerification::SystemDefaults, TlsVerification::CustomCa);
    store.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    if let Some(ms) = profile.confirmation_delay_ms {
        store.confirmation_delay = Duration::from_millis(ms);
    }
    if let Some(secs) = profile.redirect_countdown_secs {
        store.redirect_countdown = Duration::from_secs(secs);
    }
    Ok(store)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert_eq!(cfg.defaults.output, "table");
        assert_eq!(cfg.defaults.timeout, 30);
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn profiles_load_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
default_profile = "local"

[defaults]
output = "json"

[profiles.local]
api_url = "http://localhost:3000"
timeout = 5
confirmation_delay_ms = 250
"#,
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.active_profile_name(None), "local");
        assert_eq!(cfg.active_profile_name(Some("other")), "other");
        assert_eq!(cfg.defaults.output, "json");
        assert_eq!(cfg.defaults.color, "auto");

        let local = &cfg.profiles["local"];
        assert_eq!(local.api_url, "http://localhost:3000");
        assert_eq!(local.timeout, Some(5));
        assert_eq!(local.redirect_countdown_secs, None);
    }

    #[test]
    fn save_then_load_keeps_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        let mut profile = Profile::for_url("http://shop.test");
        profile.set("redirect-countdown-secs", "3").unwrap();
        cfg.profiles.insert("staging".into(), profile);
        cfg.default_profile = Some("staging".into());
        save_config_to(&cfg, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("[profiles.staging]"));
        assert!(!written.contains("ca_cert"));

        assert_eq!(load_config_from(&path).unwrap(), cfg);
    }

    #[test]
    fn profile_translates_to_store_config() {
        let mut profile = Profile::for_url("http://localhost:3000");
        profile.ca_cert = Some("/etc/ca.pem".into());
        profile.confirmation_delay_ms = Some(500);
        profile.redirect_countdown_secs = Some(3);

        let store = profile_to_store_config(&profile, &Defaults::default()).unwrap();
        assert_eq!(store.api_url.as_str(), "http://localhost:3000/");
        assert_eq!(store.tls, TlsVerification::CustomCa("/etc/ca.pem".into()));
        assert_eq!(store.timeout, Duration::from_secs(30));
        assert_eq!(store.confirmation_delay, Duration::from_millis(500));
        assert_eq!(store.redirect_countdown, Duration::from_secs(3));
    }

    #[test]
    fn unset_timings_keep_store_defaults() {
        let profile = Profile::default();
        let defaults = Defaults {
            timeout: 7,
            ..Defaults::default()
        };
        let store = profile_to_store_config(&profile, &defaults).unwrap();
        assert_eq!(store.api_url.as_str(), "https://fakestoreapi.com/");
        assert_eq!(store.timeout, Duration::from_secs(7));
        assert_eq!(store.confirmation_delay, Duration::from_secs(2));
        assert_eq!(store.redirect_countdown, Duration::from_secs(10));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut profile = Profile::default();
        assert!(matches!(
            profile.set("timeout", "soon"),
            Err(ConfigError::Validation { ref field, .. }) if field == "timeout"
        ));
        assert!(profile.set("api_url", "not a url").is_err());
        assert!(profile.set("colour", "red").is_err());

        let bad = Profile::for_url("::nope::");
        assert!(profile_to_store_config(&bad, &Defaults::default()).is_err());
    }
}
