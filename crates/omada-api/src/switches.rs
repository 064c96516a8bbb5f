// Switch port endpoints: PoE state, PoE budget, and port write actions

use serde_json::json;
use tracing::debug;

use crate::client::{OmadaClient, PAGE_SIZE, page_params, paginate_all};
use crate::envelope::Page;
use crate::error::Error;
use crate::models::{PoePortEntry, PoeUsageEntry};

impl OmadaClient {
    pub async fn list_poe_ports_page(
        &self,
        site_id: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Page<PoePortEntry>, Error> {
        self.get(
            &self.site(site_id, "switches/ports/poe-info"),
            &page_params(page, page_size),
        )
        .await
    }

    /// PoE state of every switch port on a site, unfiltered.
    pub async fn list_poe_ports(&self, site_id: &str) -> Result<Vec<PoePortEntry>, Error> {
        debug!(site_id, "listing PoE ports");
        paginate_all(PAGE_SIZE, |page, size| {
            self.list_poe_ports_page(site_id, page, size)
        })
        .await
    }

    /// Per-switch PoE power budget.
    pub async fn poe_usage(&self, site_id: &str) -> Result<Vec<PoeUsageEntry>, Error> {
        let list: Option<Vec<PoeUsageEntry>> = self
            .get(&self.site(site_id, "dashboard/poe-usage"), &[])
            .await?;
        Ok(list.unwrap_or_default())
    }

    // ── Port actions ─────────────────────────────────────────────────

    /// Enable or disable PoE output on one port.
    pub async fn set_port_poe(
        &self,
        site_id: &str,
        switch_mac: &str,
        port: u32,
        enable: bool,
    ) -> Result<(), Error> {
        debug!(site_id, switch_mac, port, enable, "setting PoE mode");
        let _: serde_json::Value = self
            .put(
                &self.site(site_id, &format!("switches/{switch_mac}/ports/{port}/poe-mode")),
                &json!({ "poeMode": u8::from(enable) }),
            )
            .await?;
        Ok(())
    }

    /// Toggle the per-port profile override.
    pub async fn set_port_profile_override(
        &self,
        site_id: &str,
        switch_mac: &str,
        port: u32,
        enable: bool,
    ) -> Result<(), Error> {
        debug!(site_id, switch_mac, port, enable, "setting profile override");
        let _: serde_json::Value = self
            .put(
                &self.site(
                    site_id,
                    &format!("switches/{switch_mac}/ports/{port}/profile-override"),
                ),
                &json!({ "profileOverrideEnable": enable }),
            )
            .await?;
        Ok(())
    }
}
