//! Config file and profile helpers that never contact the controller.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::active_profile_name;
use crate::error::CliError;
use crate::output;

use super::util;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&omada_config::config_path().display().to_string(), global.quiet);
        }
        ConfigCommand::Profiles => {
            let cfg = omada_config::load_config()?;
            let default = active_profile_name(global, &cfg);
            let mut names: Vec<&String> = cfg.profiles.keys().collect();
            names.sort_unstable();
            let lines: Vec<String> = names
                .into_iter()
                .map(|name| {
                    if *name == default {
                        format!("{name} (active)")
                    } else {
                        name.clone()
                    }
                })
                .collect();
            output::print_output(&lines.join("\n"), global.quiet);
        }
        ConfigCommand::SetSecret => {
            let cfg = omada_config::load_config()?;
            let profile = active_profile_name(global, &cfg);
            let secret = rpassword::prompt_password(format!("Client secret for '{profile}': "))?;
            if secret.trim().is_empty() {
                return Err(CliError::Validation {
                    field: "client secret".into(),
                    reason: "must not be empty".into(),
                });
            }
            omada_config::store_client_secret(&profile, secret.trim())?;
            util::done(&format!("Stored client secret for '{profile}' in the keyring"), global.quiet);
        }
    }
    Ok(())
}
