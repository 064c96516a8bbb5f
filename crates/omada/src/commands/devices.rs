//! Device listing and device actions.

use omada_core::{Controller, DeviceSnapshot};
use tabled::Tabled;

use crate::cli::{DeviceArgs, DeviceCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Type")]
    dtype: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Clients")]
    clients: i64,
    #[tabled(rename = "Uptime")]
    uptime: String,
    #[tabled(rename = "Uplink")]
    uplink: String,
}

fn row(d: &DeviceSnapshot, color: bool) -> DeviceRow {
    let fallback = if d.is_connected() { "Connected" } else { "Disconnected" };
    let status = d.detail_status.clone().unwrap_or_else(|| fallback.to_owned());
    let uplink = d.uplink.as_ref().map_or_else(
        || "-".into(),
        |u| {
            let name = u.device_name.as_deref().unwrap_or("?");
            match (u.port, u.link_speed.as_deref()) {
                (Some(port), Some(speed)) => format!("{name} #{port} ({speed})"),
                (Some(port), None) => format!("{name} #{port}"),
                (None, _) => name.to_owned(),
            }
        },
    );
    DeviceRow {
        name: d.name.clone(),
        mac: d.mac.to_string(),
        dtype: d.device_type.to_string(),
        model: d.model.clone(),
        status: output::status(&status, d.is_connected(), color),
        ip: output::opt(d.ip.as_deref()),
        clients: d.client_count,
        uptime: output::duration_secs(d.uptime_secs),
        uplink,
    }
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn list(controller: &Controller, global: &GlobalOpts) -> Result<(), CliError> {
    let site = util::resolve_site(controller).await?;
    let snapshot = controller.site_snapshot(&site).await?;
    for step in &snapshot.failed_steps {
        tracing::warn!(step = %step, "enrichment unavailable");
    }

    let devices: Vec<&DeviceSnapshot> = snapshot.devices.values().collect();
    let color = output::should_color(&global.color);
    let out = output::render_list(
        &global.output,
        &devices,
        |d| row(d, color),
        |d| d.mac.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn handle(
    controller: &Controller,
    args: DeviceArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let site = util::resolve_site(controller).await?;
    match args.command {
        DeviceCommand::Reboot { mac } => {
            let mac = util::parse_mac(&mac)?;
            controller.reboot_device(&site, &mac).await?;
            util::done(&format!("Reboot requested for {mac}"), global.quiet);
        }
        DeviceCommand::Locate { mac, state } => {
            let mac = util::parse_mac(&mac)?;
            controller.locate_device(&site, &mac, state.enabled()).await?;
            util::done(
                &format!("Locate {} for {mac}", if state.enabled() { "on" } else { "off" }),
                global.quiet,
            );
        }
    }
    Ok(())
}
