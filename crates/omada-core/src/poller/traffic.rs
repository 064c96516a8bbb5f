// ── Application traffic poller ──
//
// Per selected client, fetches per-application byte counters for the window
// [local midnight, now] and keeps only the selected applications. The map is
// rebuilt from scratch every cycle; the only state carried between cycles is
// the instant of the last daily reset.

use std::collections::{BTreeMap, BTreeSet};
use std::future::Future;

use chrono::{DateTime, Local, TimeZone};
use futures_util::future::join_all;
use omada_api::OmadaClient;
use tracing::{debug, info, warn};

use crate::convert::app_usage_from_raw;
use crate::error::CoreError;
use crate::model::{AppTrafficSnapshot, AppUsage, MacAddress, Site};

use super::Poller;

/// Midnight at the start of `now`'s calendar day, in `now`'s time zone.
///
/// Falls back to `now` when midnight does not exist locally (DST gap).
pub fn local_midnight<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Tz> {
    now.date_naive()
        .and_hms_opt(0, 0, 0)
        .and_then(|midnight| midnight.and_local_timezone(now.timezone()).earliest())
        .unwrap_or_else(|| now.clone())
}

pub struct AppTrafficPoller {
    client: OmadaClient,
    site: Site,
    clients: Vec<MacAddress>,
    applications: BTreeSet<i64>,
    reset_at: Option<DateTime<Local>>,
}

impl AppTrafficPoller {
    pub fn new(
        client: OmadaClient,
        site: Site,
        clients: impl IntoIterator<Item = MacAddress>,
        applications: impl IntoIterator<Item = i64>,
    ) -> Self {
        Self {
            client,
            site,
            clients: clients.into_iter().collect(),
            applications: applications.into_iter().collect(),
            reset_at: None,
        }
    }

    /// Instant of the last daily reset, `None` before the first cycle.
    pub fn reset_at(&self) -> Option<DateTime<Local>> {
        self.reset_at
    }

    /// Run one cycle as of `now`.
    pub async fn cycle_at(&mut self, now: DateTime<Local>) -> Result<AppTrafficSnapshot, CoreError> {
        let midnight = local_midnight(&now);
        if self.reset_at.is_none_or(|r| r.date_naive() != now.date_naive()) {
            info!(site = %self.site.name, reset_at = %midnight, "starting new traffic day");
            self.reset_at = Some(midnight);
        }

        let start = midnight.timestamp();
        let end = now.timestamp();
        let site_id = self.site.id.as_str();
        let applications = &self.applications;
        let client = &self.client;

        let results = join_all(self.clients.iter().map(|mac| async move {
            let records = client
                .client_app_traffic(site_id, mac.as_str(), start, end)
                .await?;
            let usage: BTreeMap<i64, AppUsage> = records
                .into_iter()
                .filter(|r| applications.contains(&r.application_id))
                .map(app_usage_from_raw)
                .map(|u| (u.application_id, u))
                .collect();
            Ok::<_, CoreError>(usage)
        }))
        .await;

        let mut clients = BTreeMap::new();
        for (mac, result) in self.clients.iter().zip(results) {
            match result {
                Ok(usage) if usage.is_empty() => {}
                Ok(usage) => {
                    clients.insert(mac.clone(), usage);
                }
                Err(e) if e.requires_operator() => return Err(e),
                Err(e) => {
                    warn!(site = %self.site.name, client = %mac, error = %e, "traffic fetch failed, skipping client");
                }
            }
        }
        debug!(site = %self.site.name, clients = clients.len(), "application traffic fetched");

        Ok(AppTrafficSnapshot {
            reset_at: self.reset_at.unwrap_or(midnight),
            window_start: midnight,
            window_end: now,
            clients,
        })
    }
}

impl Poller for AppTrafficPoller {
    type Snapshot = AppTrafficSnapshot;

    fn label(&self) -> String {
        format!("traffic:{}", self.site.name)
    }

    fn poll_once(&mut self) -> impl Future<Output = Result<AppTrafficSnapshot, CoreError>> + Send {
        self.cycle_at(Local::now())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, FixedOffset};
    use omada_api::{ClientCredentials, NoopTokenStore, Session, TokenSet};
    use secrecy::SecretString;
    use url::Url;

    use super::*;

    fn idle_poller() -> AppTrafficPoller {
        let session = Session {
            base_url: Url::parse("http://127.0.0.1:1").unwrap(),
            omada_id: "omadac".into(),
            credentials: ClientCredentials {
                client_id: "id".into(),
                client_secret: SecretString::from("secret".to_owned()),
            },
            tokens: TokenSet::expired(),
        };
        let client =
            OmadaClient::with_client(reqwest::Client::new(), session, Arc::new(NoopTokenStore))
                .unwrap();
        let site = Site {
            id: "site_001".into(),
            name: "Main Office".into(),
            region: None,
            time_zone: None,
        };
        AppTrafficPoller::new(client, site, Vec::new(), [7])
    }

    #[test]
    fn midnight_in_fixed_zone() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let now = tz.with_ymd_and_hms(2026, 3, 10, 8, 15, 0).unwrap();
        let midnight = local_midnight(&now);
        assert_eq!(midnight, tz.with_ymd_and_hms(2026, 3, 10, 0, 0, 0).unwrap());
    }

    #[tokio::test]
    async fn new_day_resets_to_todays_midnight() {
        let mut poller = idle_poller();
        let now = Local::now();
        poller.reset_at = Some(local_midnight(&now) - Duration::days(1));

        let snapshot = poller.cycle_at(now).await.unwrap();
        let midnight = local_midnight(&now);
        assert_eq!(poller.reset_at(), Some(midnight));
        assert_eq!(snapshot.reset_at, midnight);
        assert_eq!(snapshot.window_start, midnight);
        assert_eq!(snapshot.window_end, now);
        assert!(snapshot.clients.is_empty());
    }

    #[tokio::test]
    async fn same_day_keeps_reset_instant() {
        let mut poller = idle_poller();
        let now = Local::now();
        poller.cycle_at(now).await.unwrap();
        let first = poller.reset_at().unwrap();

        poller.cycle_at(now).await.unwrap();
        assert_eq!(poller.reset_at(), Some(first));
        assert_eq!(first, local_midnight(&now));
    }
}
