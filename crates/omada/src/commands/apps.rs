//! DPI application catalogue.

use omada_core::{ApplicationEntry, Controller};
use tabled::Tabled;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct AppRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Family")]
    family: String,
}

impl From<&ApplicationEntry> for AppRow {
    fn from(a: &ApplicationEntry) -> Self {
        Self {
            id: a.application_id,
            name: output::opt(a.application_name.as_deref()),
            family: output::opt(a.family.as_deref()),
        }
    }
}

pub async fn handle(controller: &Controller, global: &GlobalOpts) -> Result<(), CliError> {
    let site = util::resolve_site(controller).await?;
    let apps = controller.list_applications(&site).await?;
    let out = output::render_list(&global.output, &apps, |r| AppRow::from(r), |a| {
        a.application_id.to_string()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
