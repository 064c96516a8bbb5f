// Wireless endpoints
//
// SSIDs are nested under WLAN groups, so listing them is a two-level walk:
// WLAN groups first, then each group's (paged) SSID list.

use futures_util::future::try_join_all;
use tracing::debug;

use crate::client::{OmadaClient, page_params, paginate_all};
use crate::envelope::Page;
use crate::error::Error;
use crate::models::{SsidEntry, WlanEntry, WlanSsid};

const SSID_PAGE_SIZE: u32 = 100;

impl OmadaClient {
    pub async fn list_wlans(&self, site_id: &str) -> Result<Vec<WlanEntry>, Error> {
        let wlans: Option<Vec<WlanEntry>> = self
            .get(&self.site(site_id, "wireless-network/wlans"), &[])
            .await?;
        Ok(wlans.unwrap_or_default())
    }

    pub async fn list_ssids_page(
        &self,
        site_id: &str,
        wlan_id: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Page<SsidEntry>, Error> {
        self.get(
            &self.site(site_id, &format!("wireless-network/wlans/{wlan_id}/ssids")),
            &page_params(page, page_size),
        )
        .await
    }

    /// Every SSID on a site, flattened with its WLAN group.
    pub async fn list_site_ssids(&self, site_id: &str) -> Result<Vec<WlanSsid>, Error> {
        let wlans = self.list_wlans(site_id).await?;
        debug!(site_id, wlans = wlans.len(), "listing SSIDs");

        let per_wlan = try_join_all(wlans.iter().map(|wlan| async move {
            let ssids = paginate_all(SSID_PAGE_SIZE, |page, size| {
                self.list_ssids_page(site_id, &wlan.wlan_id, page, size)
            })
            .await?;
            Ok::<_, Error>(
                ssids
                    .into_iter()
                    .map(|ssid| WlanSsid {
                        wlan_id: wlan.wlan_id.clone(),
                        wlan_name: wlan.name.clone(),
                        ssid,
                    })
                    .collect::<Vec<_>>(),
            )
        }))
        .await?;

        Ok(per_wlan.into_iter().flatten().collect())
    }

    /// Patch an SSID's basic configuration (name, broadcast, etc.).
    pub async fn update_ssid(
        &self,
        site_id: &str,
        wlan_id: &str,
        ssid_id: &str,
        patch: &serde_json::Value,
    ) -> Result<(), Error> {
        debug!(site_id, wlan_id, ssid_id, "updating SSID");
        let _: serde_json::Value = self
            .patch(
                &self.site(
                    site_id,
                    &format!("wireless-network/wlans/{wlan_id}/ssids/{ssid_id}/update-basic-config"),
                ),
                patch,
            )
            .await?;
        Ok(())
    }
}
