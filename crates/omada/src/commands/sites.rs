//! Site listing.

use omada_core::{Controller, Site};
use tabled::Tabled;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct SiteRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Region")]
    region: String,
    #[tabled(rename = "Time Zone")]
    time_zone: String,
}

impl From<&Site> for SiteRow {
    fn from(s: &Site) -> Self {
        Self {
            id: s.id.clone(),
            name: s.name.clone(),
            region: output::opt(s.region.as_deref()),
            time_zone: output::opt(s.time_zone.as_deref()),
        }
    }
}

pub async fn handle(controller: &Controller, global: &GlobalOpts) -> Result<(), CliError> {
    let sites = controller.list_sites().await?;
    let out = output::render_list(&global.output, &sites, |r| SiteRow::from(r), |s| s.id.clone());
    output::print_output(&out, global.quiet);
    Ok(())
}
