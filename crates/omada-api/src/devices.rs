// Device endpoints
//
// Site-scoped listing plus the uplink topology and per-band client counters
// used to enrich it, and the device-level write actions.

use serde_json::json;
use tracing::debug;

use crate::client::{OmadaClient, PAGE_SIZE, page_params, paginate_all};
use crate::envelope::Page;
use crate::error::Error;
use crate::models::{BandStatsEntry, DeviceEntry, UplinkEntry};

impl OmadaClient {
    /// One page of adopted devices.
    pub async fn list_devices_page(
        &self,
        site_id: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Page<DeviceEntry>, Error> {
        self.get(&self.site(site_id, "devices"), &page_params(page, page_size))
            .await
    }

    /// Every adopted device on a site.
    pub async fn list_devices(&self, site_id: &str) -> Result<Vec<DeviceEntry>, Error> {
        debug!(site_id, "listing devices");
        paginate_all(PAGE_SIZE, |page, size| {
            self.list_devices_page(site_id, page, size)
        })
        .await
    }

    /// Uplink topology for the given devices.
    ///
    /// `POST /sites/{site}/devices/uplink-info` with `{"deviceMacs": [...]}`.
    /// Returns an empty list without a request when `macs` is empty.
    pub async fn device_uplink_info(
        &self,
        site_id: &str,
        macs: &[String],
    ) -> Result<Vec<UplinkEntry>, Error> {
        if macs.is_empty() {
            return Ok(Vec::new());
        }
        debug!(site_id, count = macs.len(), "fetching uplink info");
        let list: Option<Vec<UplinkEntry>> = self
            .post(
                &self.site(site_id, "devices/uplink-info"),
                &json!({ "deviceMacs": macs }),
            )
            .await?;
        Ok(list.unwrap_or_default())
    }

    /// Per-band client counts for a set of APs.
    ///
    /// Controller-scoped: `POST /clients/stat/devices` with
    /// `{"devices": [{"mac", "siteId"}]}`.
    pub async fn ap_band_stats(
        &self,
        site_id: &str,
        ap_macs: &[String],
    ) -> Result<Vec<BandStatsEntry>, Error> {
        if ap_macs.is_empty() {
            return Ok(Vec::new());
        }
        let devices: Vec<_> = ap_macs
            .iter()
            .map(|mac| json!({ "mac": mac, "siteId": site_id }))
            .collect();
        let list: Option<Vec<BandStatsEntry>> = self
            .post(&self.v1("clients/stat/devices"), &json!({ "devices": devices }))
            .await?;
        Ok(list.unwrap_or_default())
    }

    // ── Device actions ───────────────────────────────────────────────

    /// Reboot a device.
    pub async fn reboot_device(&self, site_id: &str, mac: &str) -> Result<(), Error> {
        debug!(site_id, mac, "rebooting device");
        let _: serde_json::Value = self
            .post(&self.site(site_id, &format!("devices/{mac}/reboot")), &json!({}))
            .await?;
        Ok(())
    }

    /// Start or stop the locate (LED blink) function on a device.
    pub async fn locate_device(&self, site_id: &str, mac: &str, enable: bool) -> Result<(), Error> {
        debug!(site_id, mac, enable, "setting locate");
        let _: serde_json::Value = self
            .post(
                &self.site(site_id, &format!("devices/{mac}/locate")),
                &json!({ "locateEnable": enable }),
            )
            .await?;
        Ok(())
    }
}
