// Site endpoints
//
// Site listing is controller-scoped: `/openapi/v1/{omadacId}/sites`.

use tracing::debug;

use crate::client::{OmadaClient, PAGE_SIZE, page_params, paginate_all};
use crate::envelope::Page;
use crate::error::Error;
use crate::models::SiteEntry;

impl OmadaClient {
    /// One page of the sites visible to this application.
    pub async fn list_sites_page(&self, page: u32, page_size: u32) -> Result<Page<SiteEntry>, Error> {
        self.get(&self.v1("sites"), &page_params(page, page_size)).await
    }

    /// Every site, across all pages.
    pub async fn list_sites(&self) -> Result<Vec<SiteEntry>, Error> {
        debug!("listing sites");
        paginate_all(PAGE_SIZE, |page, size| self.list_sites_page(page, size)).await
    }
}
