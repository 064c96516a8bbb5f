//! Today's per-application traffic for one client.

use chrono::Local;
use omada_core::convert::app_usage_from_raw;
use omada_core::poller::local_midnight;
use omada_core::{AppUsage, Controller};
use tabled::Tabled;

use crate::cli::{GlobalOpts, TrafficArgs};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct UsageRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Application")]
    name: String,
    #[tabled(rename = "Upload")]
    upload: String,
    #[tabled(rename = "Download")]
    download: String,
    #[tabled(rename = "Total")]
    total: String,
}

impl From<&AppUsage> for UsageRow {
    fn from(u: &AppUsage) -> Self {
        Self {
            id: u.application_id,
            name: u.name.clone(),
            upload: output::bytes(u.upload),
            download: output::bytes(u.download),
            total: output::bytes(u.traffic),
        }
    }
}

pub async fn handle(
    controller: &Controller,
    args: TrafficArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let site = util::resolve_site(controller).await?;
    let mac = util::parse_mac(&args.mac)?;
    let wanted = if args.applications.is_empty() {
        controller.config().applications.clone()
    } else {
        args.applications
    };

    let now = Local::now();
    let start = local_midnight(&now);
    let records = controller
        .client()
        .client_app_traffic(&site.id, mac.as_str(), start.timestamp(), now.timestamp())
        .await
        .map_err(omada_core::CoreError::from)?;

    let mut usage: Vec<AppUsage> = records
        .into_iter()
        .filter(|r| wanted.is_empty() || wanted.contains(&r.application_id))
        .map(app_usage_from_raw)
        .collect();
    usage.sort_by(|a, b| b.traffic.cmp(&a.traffic));

    let out = output::render_list(&global.output, &usage, |r| UsageRow::from(r), |u| {
        u.application_id.to_string()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
