//! SSID listing and SSID actions.

use omada_core::{Controller, SsidState};
use serde_json::json;
use tabled::Tabled;

use crate::cli::{GlobalOpts, SsidArgs, SsidCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct SsidRow {
    #[tabled(rename = "SSID")]
    name: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "WLAN")]
    wlan: String,
    #[tabled(rename = "Broadcast")]
    broadcast: String,
    #[tabled(rename = "Guest")]
    guest: String,
}

impl From<&SsidState> for SsidRow {
    fn from(s: &SsidState) -> Self {
        Self {
            name: s.ssid_name.clone(),
            id: s.ssid_id.clone(),
            wlan: s.wlan_name.clone().unwrap_or_else(|| s.wlan_id.clone()),
            broadcast: if s.broadcast { "yes" } else { "no" }.into(),
            guest: if s.guest { "yes" } else { "no" }.into(),
        }
    }
}

pub async fn list(controller: &Controller, global: &GlobalOpts) -> Result<(), CliError> {
    let site = util::resolve_site(controller).await?;
    let snapshot = controller.site_snapshot(&site).await?;
    let out = output::render_list(&global.output, &snapshot.ssids, |r| SsidRow::from(r), |s| {
        s.ssid_id.clone()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn handle(
    controller: &Controller,
    args: SsidArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let site = util::resolve_site(controller).await?;
    match args.command {
        SsidCommand::Broadcast { wlan, ssid, state } => {
            controller
                .update_ssid(&site, &wlan, &ssid, &json!({ "broadcast": state.enabled() }))
                .await?;
            util::done(
                &format!(
                    "Broadcast {} for SSID {ssid}",
                    if state.enabled() { "enabled" } else { "disabled" }
                ),
                global.quiet,
            );
        }
    }
    Ok(())
}
