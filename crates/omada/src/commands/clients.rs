//! Client listing and client actions.

use omada_core::{ClientSnapshot, ConnectionKind, Controller};
use tabled::Tabled;

use crate::cli::{ClientArgs, ClientCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct ClientRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Link")]
    link: String,
    #[tabled(rename = "Attached To")]
    parent: String,
    #[tabled(rename = "Down")]
    down: String,
    #[tabled(rename = "Up")]
    up: String,
}

impl From<&ClientSnapshot> for ClientRow {
    fn from(c: &ClientSnapshot) -> Self {
        let (link, parent) = match c.connection() {
            ConnectionKind::Wireless => (
                c.ssid.clone().unwrap_or_else(|| "wireless".into()),
                c.ap_name.clone(),
            ),
            ConnectionKind::Wired => (
                c.port.map_or_else(|| "wired".into(), |p| format!("port {p}")),
                c.switch_name.clone().or_else(|| c.gateway_name.clone()),
            ),
        };
        Self {
            name: c.name.clone(),
            mac: c.mac.to_string(),
            ip: output::opt(c.ip.as_deref()),
            link,
            parent: output::opt(parent),
            down: output::bytes(c.traffic_down),
            up: output::bytes(c.traffic_up),
        }
    }
}

pub async fn list(controller: &Controller, global: &GlobalOpts) -> Result<(), CliError> {
    let site = util::resolve_site(controller).await?;
    let mut clients = controller.list_clients(&site).await?;
    clients.sort_by(|a, b| a.mac.cmp(&b.mac));
    let out = output::render_list(&global.output, &clients, |r| ClientRow::from(r), |c| {
        c.mac.to_string()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn handle(
    controller: &Controller,
    args: ClientArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let site = util::resolve_site(controller).await?;
    let (verb, mac) = match args.command {
        ClientCommand::Block { mac } => {
            let mac = util::parse_mac(&mac)?;
            controller.block_client(&site, &mac).await?;
            ("Blocked", mac)
        }
        ClientCommand::Unblock { mac } => {
            let mac = util::parse_mac(&mac)?;
            controller.unblock_client(&site, &mac).await?;
            ("Unblocked", mac)
        }
        ClientCommand::Reconnect { mac } => {
            let mac = util::parse_mac(&mac)?;
            controller.reconnect_client(&site, &mac).await?;
            ("Reconnect requested for", mac)
        }
    };
    util::done(&format!("{verb} {mac}"), global.quiet);
    Ok(())
}
