//! Gateway WAN port status.

use omada_core::{Controller, MacAddress, WanPortState};
use serde::Serialize;
use tabled::Tabled;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize)]
struct WanEntry<'a> {
    gateway: &'a MacAddress,
    gateway_name: &'a str,
    #[serde(flatten)]
    port: &'a WanPortState,
}

#[derive(Tabled)]
struct WanRow {
    #[tabled(rename = "Gateway")]
    gateway: String,
    #[tabled(rename = "Port")]
    port: String,
    #[tabled(rename = "Link")]
    link: String,
    #[tabled(rename = "Internet")]
    internet: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Speed")]
    speed: String,
    #[tabled(rename = "Latency (ms)")]
    latency: String,
    #[tabled(rename = "Loss (%)")]
    loss: String,
}

fn row(w: &WanEntry<'_>, color: bool) -> WanRow {
    WanRow {
        gateway: w.gateway_name.to_owned(),
        port: w.port.port_name.clone(),
        link: output::status(if w.port.connected { "up" } else { "down" }, w.port.connected, color),
        internet: output::status(if w.port.internet { "online" } else { "offline" }, w.port.internet, color),
        ip: output::opt(w.port.ip.as_deref()),
        speed: output::opt(w.port.link_speed.as_deref()),
        latency: output::opt(w.port.latency),
        loss: output::opt(w.port.loss),
    }
}

pub async fn handle(controller: &Controller, global: &GlobalOpts) -> Result<(), CliError> {
    let site = util::resolve_site(controller).await?;
    let snapshot = controller.site_snapshot(&site).await?;

    let entries: Vec<WanEntry<'_>> = snapshot
        .wan_status
        .iter()
        .flat_map(|(mac, ports)| {
            let gateway_name = snapshot
                .devices
                .get(mac)
                .map_or(mac.as_str(), |d| d.name.as_str());
            ports.iter().map(move |port| WanEntry {
                gateway: mac,
                gateway_name,
                port,
            })
        })
        .collect();

    let color = output::should_color(&global.color);
    let out = output::render_list(
        &global.output,
        &entries,
        |w| row(w, color),
        |w| format!("{} {}", w.gateway, w.port.port_name),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
