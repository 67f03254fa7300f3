// ── Runtime store configuration ──
//
// Describes *where* the product API lives and how long the UI-facing
// timers run. The CLI builds a `StoreConfig` from its profile and hands
// it in; core never reads config files.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::CoreError;

/// Delay between a successful mutation and the follow-up navigation.
pub const DEFAULT_CONFIRMATION_DELAY: Duration = Duration::from_secs(2);

/// Countdown shown on the not-found screen before redirecting home.
pub const DEFAULT_REDIRECT_COUNTDOWN: Duration = Duration::from_secs(10);

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub use storefront_api::DEFAULT_BASE_URL as DEFAULT_API_URL;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store.
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
}

/// Configuration for a single storefront session.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// API root, e.g. `https://fakestoreapi.com`.
    pub api_url: Url,
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
    /// How long a mutation's confirmation is shown before the flow moves on.
    pub confirmation_delay: Duration,
    /// How long the not-found screen counts down before redirecting.
    pub redirect_countdown: Duration,
}

impl StoreConfig {
    /// Config pointing at `api_url` with default timings.
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            tls: TlsVerification::default(),
            timeout: DEFAULT_TIMEOUT,
            confirmation_delay: DEFAULT_CONFIRMATION_DELAY,
            redirect_countdown: DEFAULT_REDIRECT_COUNTDOWN,
        }
    }

    /// Parse `raw` as the API root.
    pub fn for_url(raw: &str) -> Result<Self, CoreError> {
        let api_url = Url::parse(raw).map_err(|e| CoreError::Config {
            message: format!("invalid API URL '{raw}': {e}"),
        })?;
        Ok(Self::new(api_url))
    }

    /// Config for the public demo API.
    pub fn public() -> Result<Self, CoreError> {
        Self::for_url(DEFAULT_API_URL)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn public_config_uses_default_timings() {
        let cfg = StoreConfig::public().unwrap();
        assert_eq!(cfg.api_url.as_str(), "https://fakestoreapi.com/");
        assert_eq!(cfg.confirmation_delay, Duration::from_secs(2));
        assert_eq!(cfg.redirect_countdown, Duration::from_secs(10));
        assert_eq!(cfg.tls, TlsVerification::SystemDefaults);
    }

    #[test]
    fn invalid_url_is_a_config_error() {
        assert!(matches!(
            StoreConfig::for_url("::nope"),
            Err(CoreError::Config { .. })
        ));
    }
}
