// ── Client presence poller ──
//
// Fetches the full client list of one site and keeps only the clients the
// operator selected. A selected client missing from the list is offline,
// not an error.

use std::collections::{BTreeMap, BTreeSet};
use std::future::Future;

use chrono::{DateTime, Utc};
use omada_api::OmadaClient;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::convert::client_from_raw;
use crate::error::CoreError;
use crate::model::{ClientSnapshot, MacAddress, Site};

use super::Poller;

/// One published cycle of the presence poller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientPresenceSnapshot {
    pub site_id: String,
    /// Selected clients currently known to the controller.
    pub clients: BTreeMap<MacAddress, ClientSnapshot>,
    pub fetched_at: DateTime<Utc>,
}

impl ClientPresenceSnapshot {
    pub fn is_present(&self, mac: &MacAddress) -> bool {
        self.clients.contains_key(mac)
    }
}

pub struct ClientPresencePoller {
    client: OmadaClient,
    site: Site,
    selected: BTreeSet<MacAddress>,
}

impl ClientPresencePoller {
    pub fn new(client: OmadaClient, site: Site, selected: impl IntoIterator<Item = MacAddress>) -> Self {
        Self {
            client,
            site,
            selected: selected.into_iter().collect(),
        }
    }

    pub async fn fetch(&self) -> Result<ClientPresenceSnapshot, CoreError> {
        let raw = self.client.list_clients(&self.site.id).await?;
        let all = raw.into_iter().filter_map(client_from_raw);
        let clients = project(all, &self.selected);
        debug!(
            site = %self.site.name,
            selected = self.selected.len(),
            present = clients.len(),
            "client presence fetched"
        );
        Ok(ClientPresenceSnapshot {
            site_id: self.site.id.clone(),
            clients,
            fetched_at: Utc::now(),
        })
    }
}

impl Poller for ClientPresencePoller {
    type Snapshot = ClientPresenceSnapshot;

    fn label(&self) -> String {
        format!("clients:{}", self.site.name)
    }

    fn poll_once(
        &mut self,
    ) -> impl Future<Output = Result<ClientPresenceSnapshot, CoreError>> + Send {
        self.fetch()
    }
}

/// Narrow `clients` to the `selected` MACs, keyed by MAC.
fn project(
    clients: impl IntoIterator<Item = ClientSnapshot>,
    selected: &BTreeSet<MacAddress>,
) -> BTreeMap<MacAddress, ClientSnapshot> {
    clients
        .into_iter()
        .filter(|c| selected.contains(&c.mac))
        .map(|c| (c.mac.clone(), c))
        .collect()
}
