// Client endpoints
//
// The client listing lives under the v2 tree and is a POST with the paging
// parameters in the body.

use serde_json::json;
use tracing::debug;

use crate::client::{OmadaClient, PAGE_SIZE, paginate_all};
use crate::envelope::Page;
use crate::error::Error;
use crate::models::ClientEntry;

impl OmadaClient {
    /// One page of connected clients.
    pub async fn list_clients_page(
        &self,
        site_id: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Page<ClientEntry>, Error> {
        self.post(
            &self.v2(&format!("sites/{site_id}/clients")),
            &json!({
                "page": page,
                "pageSize": page_size,
                "scope": 0,
                "filters": {},
            }),
        )
        .await
    }

    /// Every client currently known to the controller for a site.
    pub async fn list_clients(&self, site_id: &str) -> Result<Vec<ClientEntry>, Error> {
        debug!(site_id, "listing clients");
        paginate_all(PAGE_SIZE, |page, size| {
            self.list_clients_page(site_id, page, size)
        })
        .await
    }

    // ── Client actions ───────────────────────────────────────────────

    pub async fn block_client(&self, site_id: &str, mac: &str) -> Result<(), Error> {
        self.client_action(site_id, mac, "block").await
    }

    pub async fn unblock_client(&self, site_id: &str, mac: &str) -> Result<(), Error> {
        self.client_action(site_id, mac, "unblock").await
    }

    /// Force a wireless client to reconnect.
    pub async fn reconnect_client(&self, site_id: &str, mac: &str) -> Result<(), Error> {
        self.client_action(site_id, mac, "reconnect").await
    }

    async fn client_action(&self, site_id: &str, mac: &str, action: &str) -> Result<(), Error> {
        debug!(site_id, mac, action, "client action");
        let _: serde_json::Value = self
            .post(&self.site(site_id, &format!("clients/{mac}/{action}")), &json!({}))
            .await?;
        Ok(())
    }
}
