//! Config subcommand handlers.

use dialoguer::Input;

use storefront_config::{Config, DEFAULT_PROFILE, Profile};
use storefront_core::DEFAULT_API_URL;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: guided setup ──────────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            let mut cfg = config::load_config_or_default();

            let (profile_name, api_url, timeout) = if util::is_interactive() {
                eprintln!("Storefront CLI configuration");
                eprintln!("   Config path: {}\n", config_path.display());

                let profile_name: String = Input::new()
                    .with_prompt("Profile name")
                    .default(global.profile.clone().unwrap_or_else(|| DEFAULT_PROFILE.into()))
                    .interact_text()
                    .map_err(CliError::prompt)?;

                let api_url: String = Input::new()
                    .with_prompt("Product API URL")
                    .default(global.api_url.clone().unwrap_or_else(|| DEFAULT_API_URL.into()))
                    .validate_with(|raw: &String| {
                        url::Url::parse(raw).map(|_| ()).map_err(|e| e.to_string())
                    })
                    .interact_text()
                    .map_err(CliError::prompt)?;

                let timeout: u64 = Input::new()
                    .with_prompt("Request timeout (seconds)")
                    .default(global.timeout.unwrap_or(cfg.defaults.timeout))
                    .interact_text()
                    .map_err(CliError::prompt)?;

                (profile_name, api_url, timeout)
            } else {
                (
                    global.profile.clone().unwrap_or_else(|| DEFAULT_PROFILE.into()),
                    global.api_url.clone().unwrap_or_else(|| DEFAULT_API_URL.into()),
                    global.timeout.unwrap_or(cfg.defaults.timeout),
                )
            };

            let mut profile = cfg.profiles.remove(&profile_name).unwrap_or_default();
            profile.set("api_url", &api_url)?;
            if timeout != cfg.defaults.timeout {
                profile.timeout = Some(timeout);
            }
            cfg.profiles.insert(profile_name.clone(), profile);
            cfg.default_profile = Some(profile_name.clone());

            let path = config::save_config(&cfg)?;
            output::success(global, &format!("Configuration written to {}", path.display()));
            output::status(global, &format!("  Active profile: {profile_name}"));
            output::status(global, "  Test it: storefront products list");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            let out = output::render_single(&global.output, &cfg, show_toml, |c| {
                c.active_profile_name(global.profile.as_deref())
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config()?;
            let profile_name = cfg.active_profile_name(global.profile.as_deref());

            cfg.profiles
                .entry(profile_name.clone())
                .or_insert_with(Profile::default)
                .set(&key, &value)?;

            config::save_config(&cfg)?;
            output::success(global, &format!("Set {key} on profile '{profile_name}'"));
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config()?;
            let default = cfg.active_profile_name(None);
            if cfg.profiles.is_empty() {
                output::status(global, "No profiles configured. Run: storefront config init");
            } else {
                for (name, profile) in &cfg.profiles {
                    let marker = if *name == default { " *" } else { "" };
                    println!("{name}{marker}\t{}", profile.api_url);
                }
            }
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config()?;

            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    name,
                    available: cfg.available_profiles(),
                });
            }

            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            output::success(global, &format!("Default profile set to '{name}'"));
            Ok(())
        }
    }
}

fn show_toml(cfg: &Config) -> String {
    toml::to_string_pretty(cfg).unwrap_or_else(|e| format!("# failed to render config: {e}"))
}
