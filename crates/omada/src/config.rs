//! CLI configuration: thin wrapper around `omada_config` that applies
//! `GlobalOpts` overrides (--profile, --site, --insecure, --timeout).

use std::time::Duration;

use omada_config::{Config, TokenCache};
use omada_core::{ControllerConfig, TlsVerification};
use tracing::warn;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Everything needed to build a `Controller` for the active profile.
pub struct Resolved {
    pub profile_name: String,
    pub controller: ControllerConfig,
    pub cache: TokenCache,
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Load the config file and build the controller configuration, seeding
/// the session from the token cache when it holds a pair.
pub fn resolve(global: &GlobalOpts) -> Result<Resolved, CliError> {
    let cfg = omada_config::load_config()?;
    let profile_name = active_profile_name(global, &cfg);

    let Some(profile) = cfg.profiles.get(&profile_name) else {
        let mut available: Vec<&str> = cfg.profiles.keys().map(String::as_str).collect();
        available.sort_unstable();
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: if available.is_empty() {
                "(none)".into()
            } else {
                available.join(", ")
            },
            path: omada_config::config_path().display().to_string(),
        });
    };

    let cache = TokenCache::for_profile(&profile_name);
    let tokens = cache.load().unwrap_or_else(|e| {
        warn!(error = %e, "ignoring unreadable token cache");
        None
    });

    let mut controller = omada_config::profile_to_controller_config(profile, &profile_name, tokens)?;
    if global.insecure {
        controller.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout.or(profile.timeout) {
        controller.timeout = Duration::from_secs(secs);
    } else {
        controller.timeout = Duration::from_secs(cfg.defaults.timeout);
    }
    if let Some(ref site) = global.site {
        controller.sites = vec![site.clone()];
    }

    Ok(Resolved {
        profile_name,
        controller,
        cache,
    })
}
