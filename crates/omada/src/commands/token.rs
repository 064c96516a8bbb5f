//! Token cache inspection.

use chrono::Utc;
use omada_config::TokenCache;
use serde::Serialize;

use crate::cli::{GlobalOpts, TokenArgs, TokenCommand};
use crate::config::active_profile_name;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize)]
struct TokenStatus {
    profile: String,
    cache: String,
    cached: bool,
    expires_at: Option<String>,
    expires_in_secs: Option<i64>,
}

fn detail(s: &TokenStatus) -> String {
    if !s.cached {
        return format!(
            "Profile:  {}\nCache:    {}\nNo cached token; the next call re-issues from client credentials.",
            s.profile, s.cache
        );
    }
    let remaining = match s.expires_in_secs {
        Some(secs) if secs > 0 => output::duration_secs(u64::try_from(secs).ok()),
        _ => "expired".into(),
    };
    format!(
        "Profile:  {}\nCache:    {}\nExpires:  {}\nRemains:  {remaining}",
        s.profile,
        s.cache,
        s.expires_at.as_deref().unwrap_or("-"),
    )
}

pub fn handle(args: TokenArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = omada_config::load_config()?;
    let profile = active_profile_name(global, &cfg);
    let cache = TokenCache::for_profile(&profile);

    match args.command {
        TokenCommand::Show => {
            let tokens = cache.load()?;
            let status = TokenStatus {
                cache: cache.path().display().to_string(),
                cached: tokens.is_some(),
                expires_at: tokens.as_ref().map(|t| t.expires_at.to_rfc3339()),
                expires_in_secs: tokens
                    .as_ref()
                    .map(|t| (t.expires_at - Utc::now()).num_seconds()),
                profile,
            };
            let out = output::render_single(&global.output, &status, detail, |s| {
                s.expires_at.clone().unwrap_or_default()
            });
            output::print_output(&out, global.quiet);
        }
        TokenCommand::Clear => {
            cache.clear()?;
            util::done(&format!("Cleared cached tokens for '{profile}'"), global.quiet);
        }
    }
    Ok(())
}
