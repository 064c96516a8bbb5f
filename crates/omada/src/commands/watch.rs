//! Long-running watch mode: start every poller and print one line per
//! published cycle until Ctrl-C or until the credential chain breaks.

use chrono::Local;
use omada_core::{
    AppTrafficSnapshot, ClientPresenceSnapshot, Controller, PollHandle, PollState, SiteSnapshot,
};
use serde::Serialize;
use tokio::task::JoinSet;
use tracing::info;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

// ── Summaries ───────────────────────────────────────────────────────

fn site_summary(s: &SiteSnapshot) -> String {
    let clients: usize = s.devices.values().map(|d| d.clients.len()).sum();
    let wan_up = s.wan_status.values().flatten().filter(|w| w.connected).count();
    let wan_total = s.wan_status.values().map(Vec::len).sum::<usize>();
    let mut line = format!(
        "devices={} clients={clients} poe_ports={} ssids={} wan={wan_up}/{wan_total}",
        s.devices.len(),
        s.poe_ports.len(),
        s.ssids.len(),
    );
    if !s.failed_steps.is_empty() {
        line.push_str(&format!(" failed=[{}]", s.failed_steps.join(",")));
    }
    line
}

fn presence_summary(s: &ClientPresenceSnapshot) -> String {
    let present: Vec<&str> = s.clients.values().map(|c| c.name.as_str()).collect();
    format!("present={} [{}]", present.len(), present.join(", "))
}

fn traffic_summary(s: &AppTrafficSnapshot) -> String {
    let total: i64 = s
        .clients
        .values()
        .flat_map(|apps| apps.values())
        .map(|u| u.traffic)
        .sum();
    format!(
        "clients={} total={} since={}",
        s.clients.len(),
        output::bytes(total),
        s.window_start.format("%Y-%m-%d %H:%M"),
    )
}

// ── Event line ──────────────────────────────────────────────────────

#[derive(Serialize)]
struct Event<'a, S> {
    poller: &'a str,
    ok: bool,
    error: Option<&'a str>,
    snapshot: Option<&'a S>,
}

fn render<S: Serialize>(
    label: &str,
    state: &PollState<S>,
    json: bool,
    summarize: fn(&S) -> String,
) -> String {
    if json {
        let event = Event {
            poller: label,
            ok: state.last_cycle_succeeded,
            error: state.last_error.as_deref(),
            snapshot: state.snapshot.as_deref(),
        };
        return serde_json::to_string(&event)
            .unwrap_or_else(|e| format!("{{\"error\": \"serialization failed: {e}\"}}"));
    }

    let stamp = Local::now().format("%H:%M:%S");
    match (&state.last_error, &state.snapshot) {
        (None, Some(snapshot)) => format!("{stamp} {label} {}", summarize(snapshot)),
        (Some(error), Some(_)) => format!("{stamp} {label} FAILED ({error}), keeping last snapshot"),
        (Some(error), None) => format!("{stamp} {label} FAILED ({error})"),
        (None, None) => format!("{stamp} {label} waiting"),
    }
}

async fn follow<S>(label: String, handle: PollHandle<S>, json: bool, summarize: fn(&S) -> String)
where
    S: Serialize + Send + Sync + 'static,
{
    let mut rx = handle.subscribe();
    while rx.changed().await.is_ok() {
        let state = rx.borrow_and_update().clone();
        println!("{}", render(&label, &state, json, summarize));
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(controller: &Controller, global: &GlobalOpts) -> Result<(), CliError> {
    let mut auth_failed = controller.auth_failed();
    let pollers = controller.start().await?;
    let json = matches!(global.output, OutputFormat::Json | OutputFormat::JsonCompact);

    let mut tasks = JoinSet::new();
    for site in pollers {
        let name = &site.site.name;
        tasks.spawn(follow(format!("site:{name}"), site.devices, json, site_summary));
        if let Some(clients) = site.clients {
            tasks.spawn(follow(format!("clients:{name}"), clients, json, presence_summary));
        }
        if let Some(traffic) = site.traffic {
            tasks.spawn(follow(format!("traffic:{name}"), traffic, json, traffic_summary));
        }
    }
    info!(pollers = tasks.len(), "watching; press Ctrl-C to stop");

    let result = tokio::select! {
        signal = tokio::signal::ctrl_c() => signal.map_err(CliError::from),
        changed = auth_failed.wait_for(|failed| *failed) => match changed {
            Ok(_) => Err(CliError::AuthFailed {
                profile: "default".into(),
                message: "client credentials were rejected while polling".into(),
            }),
            Err(_) => Ok(()),
        },
    };

    controller.shutdown().await;
    tasks.abort_all();
    result
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use chrono::Utc;

    use super::*;

    fn empty_site() -> SiteSnapshot {
        SiteSnapshot {
            site_id: "site_001".into(),
            site_name: "Main Office".into(),
            devices: BTreeMap::new(),
            poe_ports: BTreeMap::new(),
            poe_budget: BTreeMap::new(),
            wan_status: BTreeMap::new(),
            ssids: Vec::new(),
            failed_steps: vec!["poe".into()],
            fetched_at: Utc::now(),
        }
    }

    #[test]
    fn site_summary_lists_failed_steps() {
        let line = site_summary(&empty_site());
        assert_eq!(
            line,
            "devices=0 clients=0 poe_ports=0 ssids=0 wan=0/0 failed=[poe]"
        );
    }

    #[test]
    fn failed_cycle_mentions_kept_snapshot() {
        let state = PollState {
            last_cycle_succeeded: false,
            snapshot: Some(Arc::new(empty_site())),
            last_error: Some("Controller request timed out".into()),
            last_success_at: None,
            cycles: 2,
        };
        let line = render("site:Main Office", &state, false, site_summary);
        assert!(line.ends_with("site:Main Office FAILED (Controller request timed out), keeping last snapshot"));

        let json = render("site:Main Office", &state, true, site_summary);
        assert!(json.starts_with(r#"{"poller":"site:Main Office","ok":false"#));
    }
}
