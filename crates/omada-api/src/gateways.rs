// Gateway endpoints: hardware info (temperature) and WAN port status

use crate::client::OmadaClient;
use crate::error::Error;
use crate::models::{GatewayInfo, WanPortEntry};

impl OmadaClient {
    pub async fn gateway_info(&self, site_id: &str, mac: &str) -> Result<GatewayInfo, Error> {
        let info: Option<GatewayInfo> = self
            .get(&self.site(site_id, &format!("gateways/{mac}")), &[])
            .await?;
        Ok(info.unwrap_or_default())
    }

    /// Per-port WAN state, in the controller's port order.
    pub async fn gateway_wan_status(
        &self,
        site_id: &str,
        mac: &str,
    ) -> Result<Vec<WanPortEntry>, Error> {
        let ports: Option<Vec<WanPortEntry>> = self
            .get(&self.site(site_id, &format!("gateways/{mac}/wan-status")), &[])
            .await?;
        Ok(ports.unwrap_or_default())
    }
}
