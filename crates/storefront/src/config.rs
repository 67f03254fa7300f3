//! Global-flag layering on top of `storefront-config`.
//!
//! Flag > env (via clap) > profile > built-in defaults. With no config
//! file and no flags the CLI talks to the public demo API.

use storefront_config::{self as config_file, Config, Profile};
use storefront_core::StoreConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use storefront_config::{config_path, load_config_or_default, save_config};

/// Load the config file, surfacing parse errors.
pub fn load_config() -> Result<Config, CliError> {
    Ok(config_file::load_config()?)
}

/// Pick the profile for this invocation and apply flag overrides.
pub fn resolve_profile(global: &GlobalOpts, cfg: &Config) -> Result<(String, Profile), CliError> {
    let name = cfg.active_profile_name(global.profile.as_deref());

    let mut profile = match cfg.profiles.get(&name) {
        Some(profile) => profile.clone(),
        // An explicitly requested profile must exist.
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name,
                available: cfg.available_profiles(),
            });
        }
        None => Profile::default(),
    };

    if let Some(ref url) = global.api_url {
        profile.api_url.clone_from(url);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
    Ok((name, profile))
}

/// Build the `StoreConfig` for commands that talk to the API.
pub fn build_store_config(global: &GlobalOpts) -> Result<StoreConfig, CliError> {
    let cfg = load_config()?;
    let (name, profile) = resolve_profile(global, &cfg)?;
    tracing::debug!(profile = %name, api_url = %profile.api_url, "resolved profile");
    Ok(config_file::profile_to_store_config(&profile, &cfg.defaults)?)
}
