// Application control (DPI) endpoints

use tracing::debug;

use crate::client::{OmadaClient, PAGE_SIZE, page_params, paginate_all};
use crate::envelope::Page;
use crate::error::Error;
use crate::models::{AppTrafficEntry, ApplicationEntry};

impl OmadaClient {
    pub async fn list_applications_page(
        &self,
        site_id: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Page<ApplicationEntry>, Error> {
        self.get(
            &self.site(site_id, "applicationControl/applications"),
            &page_params(page, page_size),
        )
        .await
    }

    /// The DPI application catalogue.
    pub async fn list_applications(&self, site_id: &str) -> Result<Vec<ApplicationEntry>, Error> {
        paginate_all(PAGE_SIZE, |page, size| {
            self.list_applications_page(site_id, page, size)
        })
        .await
    }

    /// Per-application traffic for one client over `[start, end]`
    /// (unix seconds).
    pub async fn client_app_traffic(
        &self,
        site_id: &str,
        client_mac: &str,
        start: i64,
        end: i64,
    ) -> Result<Vec<AppTrafficEntry>, Error> {
        debug!(site_id, client_mac, start, end, "fetching application traffic");
        let list: Option<Vec<AppTrafficEntry>> = self
            .get(
                &self.site(site_id, &format!("dashboard/specificClientInfo/{client_mac}")),
                &[("start", start.to_string()), ("end", end.to_string())],
            )
            .await?;
        Ok(list.unwrap_or_default())
    }
}
