// ── Raw → domain conversion ──
//
// Bridges `omada_api::models` wire records into the normalized snapshot
// types. Conversions are lenient: missing fields get documented defaults,
// and records without an identity (no MAC, no port number) are dropped.

use omada_api::models::{
    AppTrafficEntry, BandStatsEntry, ClientEntry, DeviceEntry, PoePortEntry, PoeUsageEntry,
    RawUptime, SiteEntry, UplinkEntry, WanPortEntry, WlanSsid,
};

use crate::model::{
    AppUsage, BandClients, ClientSnapshot, DeviceSnapshot, DeviceType, MacAddress, PoeBudget,
    PoePortState, PortKey, Site, SsidState, Uplink, WanPortState,
};

// ── Lookup tables ────────────────────────────────────────────────────

/// Human-readable form of the `linkSpeed` / WAN `speed` enum.
pub fn format_link_speed(code: i64) -> String {
    let label = match code {
        0 => "Auto",
        1 => "10 Mbps",
        2 => "100 Mbps",
        3 => "1 Gbps",
        4 => "2.5 Gbps",
        5 => "10 Gbps",
        6 => "5 Gbps",
        7 => "25 Gbps",
        8 => "100 Gbps",
        other => return format!("Unknown ({other})"),
    };
    label.to_owned()
}

/// Human-readable form of a device `detailStatus` code.
pub fn format_detail_status(code: i64) -> String {
    let label = match code {
        0 => "Disconnected",
        1 => "Disconnected (Migrating)",
        10 => "Provisioning",
        11 => "Configuring",
        12 => "Upgrading",
        13 => "Rebooting",
        14 => "Connected",
        15 => "Connected (Wireless)",
        16 => "Connected (Migrating)",
        17 => "Connected (Wireless, Migrating)",
        20 => "Pending",
        21 => "Pending (Wireless)",
        22 => "Adopting",
        23 => "Adopting (Wireless)",
        24 => "Adopt Failed",
        25 => "Adopt Failed (Wireless)",
        26 => "Managed By Others",
        27 => "Managed By Others (Wireless)",
        30 => "Heartbeat Missed",
        31 => "Heartbeat Missed (Wireless)",
        32 => "Heartbeat Missed (Migrating)",
        33 => "Heartbeat Missed (Wireless, Migrating)",
        40 => "Isolated",
        41 => "Isolated (Migrating)",
        50 => "Slice Configuring",
        other => return format!("Unknown ({other})"),
    };
    label.to_owned()
}

// ── Uptime ───────────────────────────────────────────────────────────

/// Parse uptime given as seconds or as `"4day(s) 17h 26m 57s"`.
///
/// A zero or unparseable total yields `None`.
pub fn parse_uptime(raw: &RawUptime) -> Option<u64> {
    match raw {
        RawUptime::Seconds(secs) => u64::try_from(*secs).ok().filter(|s| *s > 0),
        RawUptime::Text(text) => {
            let mut total: u64 = 0;
            let mut digits = String::new();
            for c in text.chars() {
                if c.is_ascii_digit() {
                    digits.push(c);
                    continue;
                }
                if digits.is_empty() {
                    continue;
                }
                let unit = match c {
                    'd' => 86_400,
                    'h' => 3_600,
                    'm' => 60,
                    's' => 1,
                    _ => 0,
                };
                let value: u64 = digits.parse().unwrap_or(0);
                total = total.saturating_add(value.saturating_mul(unit));
                digits.clear();
            }
            (total > 0).then_some(total)
        }
    }
}

// ── Sites ────────────────────────────────────────────────────────────

pub fn site_from_raw(raw: SiteEntry) -> Site {
    let name = raw.name.unwrap_or_else(|| raw.site_id.clone());
    Site {
        id: raw.site_id,
        name,
        region: raw.region,
        time_zone: raw.time_zone,
    }
}

// ── Devices ──────────────────────────────────────────────────────────

/// Normalize one device record; `None` when it carries no MAC.
pub fn device_from_raw(raw: DeviceEntry) -> Option<DeviceSnapshot> {
    let mac = non_empty(raw.mac).map(MacAddress::new)?;
    let type_name = raw.device_type.unwrap_or_else(|| "unknown".into());

    Some(DeviceSnapshot {
        mac,
        name: raw.name.unwrap_or_else(|| "Unknown Device".into()),
        model: raw.model.unwrap_or_else(|| "Unknown".into()),
        model_name: raw.model_name,
        device_type: DeviceType::from_raw(&type_name),
        type_name,
        serial: raw.sn,
        ip: raw.ip,
        public_ip: raw.public_ip,
        status: raw.status,
        detail_status: raw.detail_status.map(format_detail_status),
        uptime_secs: raw.uptime.as_ref().and_then(parse_uptime),
        cpu_util: raw.cpu_util,
        mem_util: raw.mem_util,
        firmware_version: raw.firmware_version,
        need_upgrade: raw.need_upgrade.unwrap_or(false),
        client_count: raw.client_num.unwrap_or(0),
        last_seen: raw.last_seen,
        uplink: None,
        temperature: None,
        band_clients: None,
        clients: Vec::new(),
    })
}

pub fn uplink_from_raw(raw: UplinkEntry) -> (MacAddress, Uplink) {
    let uplink = Uplink {
        device_mac: non_empty(raw.uplink_device_mac).map(MacAddress::new),
        device_name: raw.uplink_device_name,
        port: raw.uplink_device_port,
        link_speed: raw.link_speed.map(format_link_speed),
        duplex: raw.duplex,
    };
    (MacAddress::new(raw.device_mac), uplink)
}

pub fn band_clients_from_raw(raw: BandStatsEntry) -> (MacAddress, BandClients) {
    let counts = BandClients {
        total: raw.client_num.unwrap_or(0),
        band_2g: raw.client_num_2g.unwrap_or(0),
        band_5g: raw.client_num_5g.unwrap_or(0),
        band_5g2: raw.client_num_5g2.unwrap_or(0),
        band_6g: raw.client_num_6g.unwrap_or(0),
    };
    (MacAddress::new(raw.mac), counts)
}

// ── Clients ──────────────────────────────────────────────────────────

/// Normalize one client record; `None` when it carries no MAC.
pub fn client_from_raw(raw: ClientEntry) -> Option<ClientSnapshot> {
    let mac = non_empty(raw.mac).map(MacAddress::new)?;
    let name = non_empty(raw.name)
        .or_else(|| non_empty(raw.host_name.clone()))
        .unwrap_or_else(|| "Unknown".into());

    Some(ClientSnapshot {
        mac,
        name,
        host_name: raw.host_name,
        ip: raw.ip,
        vendor: raw.vendor,
        device_type: raw.device_type,
        os_name: raw.os_name,
        active: raw.active.unwrap_or(false),
        wireless: raw.wireless.unwrap_or(false),
        ssid: raw.ssid,
        signal_level: raw.signal_level,
        rssi: raw.rssi,
        channel: raw.channel,
        ap_name: raw.ap_name,
        ap_mac: non_empty(raw.ap_mac).map(MacAddress::new),
        switch_name: raw.switch_name,
        switch_mac: non_empty(raw.switch_mac).map(MacAddress::new),
        port: raw.port,
        gateway_name: raw.gateway_name,
        gateway_mac: non_empty(raw.gateway_mac).map(MacAddress::new),
        network_name: raw.network_name,
        vlan: raw.vid,
        activity: raw.activity.unwrap_or(0),
        upload_activity: raw.upload_activity.unwrap_or(0),
        traffic_down: raw.traffic_down.unwrap_or(0),
        traffic_up: raw.traffic_up.unwrap_or(0),
        uptime_secs: raw.uptime,
        last_seen: raw.last_seen,
        blocked: raw.blocked.unwrap_or(false),
        guest: raw.guest.unwrap_or(false),
    })
}

// ── PoE ──────────────────────────────────────────────────────────────

/// Keep only PoE-capable ports on PoE-capable switches.
pub fn poe_port_from_raw(raw: PoePortEntry) -> Option<(PortKey, PoePortState)> {
    if raw.support_poe != Some(true) || raw.switch_support_poe != Some(1) {
        return None;
    }
    let switch_mac = non_empty(raw.switch_mac).map(MacAddress::new)?;
    let port = raw.port?;

    let state = PoePortState {
        switch_mac: switch_mac.clone(),
        switch_name: raw.switch_name,
        port,
        port_name: raw.port_name.unwrap_or_else(|| format!("Port {port}")),
        poe_enabled: raw.poe == Some(1),
        power: raw.power.unwrap_or(0.0),
        voltage: raw.voltage.unwrap_or(0.0),
        current: raw.current.unwrap_or(0.0),
        pd_class: raw.pd_class,
        display_type: raw.poe_display_type,
        // `connectedStatus` is 0 while a link is up.
        connected: raw.connected_status == Some(0),
    };
    Some((PortKey::new(switch_mac, port), state))
}

pub fn poe_budget_from_raw(raw: PoeUsageEntry) -> PoeBudget {
    PoeBudget {
        switch_mac: MacAddress::new(raw.mac),
        name: raw.name,
        port_count: raw.port_num,
        total_power: raw.total_power.unwrap_or(0.0),
        used_power: raw.total_power_used.unwrap_or(0.0),
        used_percent: raw.total_percent_used.unwrap_or(0.0),
    }
}

// ── WAN ──────────────────────────────────────────────────────────────

/// Latency, loss and IP are withheld while the link is down.
pub fn wan_port_from_raw(index: usize, raw: WanPortEntry) -> WanPortState {
    let connected = raw.status == Some(1);
    WanPortState {
        port_name: raw.port_name.unwrap_or_else(|| format!("WAN{}", index + 1)),
        connected,
        internet: raw.internet_state == Some(1),
        ip: non_empty(raw.ip).filter(|_| connected),
        rx_rate: raw.rx_rate.unwrap_or(0.0),
        tx_rate: raw.tx_rate.unwrap_or(0.0),
        rx_total: raw.rx.unwrap_or(0.0),
        tx_total: raw.tx.unwrap_or(0.0),
        latency: raw.latency.filter(|_| connected),
        loss: raw.loss.filter(|_| connected),
        link_speed: raw.speed.map(format_link_speed),
    }
}

// ── Wireless ─────────────────────────────────────────────────────────

pub fn ssid_from_raw(raw: WlanSsid) -> SsidState {
    let ssid_name = raw.ssid.name.unwrap_or_else(|| raw.ssid.ssid_id.clone());
    SsidState {
        ssid_id: raw.ssid.ssid_id,
        ssid_name,
        wlan_id: raw.wlan_id,
        wlan_name: raw.wlan_name,
        broadcast: raw.ssid.broadcast.unwrap_or(false),
        guest: raw.ssid.guest_net_enable.unwrap_or(false),
    }
}

// ── Applications ─────────────────────────────────────────────────────

pub fn app_usage_from_raw(raw: AppTrafficEntry) -> AppUsage {
    let upload = raw.upload.unwrap_or(0);
    let download = raw.download.unwrap_or(0);
    AppUsage {
        application_id: raw.application_id,
        name: raw
            .application_name
            .unwrap_or_else(|| format!("Application {}", raw.application_id)),
        upload,
        download,
        traffic: raw.traffic.unwrap_or(upload.saturating_add(download)),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
