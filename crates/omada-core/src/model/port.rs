// ── Switch port / PoE domain types ──

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::mac::MacAddress;

/// Key for one switch port: `SWITCHMAC_port`.
///
/// Serializes as that string so it can key a JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PortKey {
    pub switch_mac: MacAddress,
    pub port: i64,
}

impl PortKey {
    pub fn new(switch_mac: MacAddress, port: i64) -> Self {
        Self { switch_mac, port }
    }
}

impl fmt::Display for PortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.switch_mac, self.port)
    }
}

impl FromStr for PortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (mac, port) = s
            .rsplit_once('_')
            .ok_or_else(|| format!("invalid port key: {s}"))?;
        let port = port
            .parse()
            .map_err(|e| format!("invalid port number in {s}: {e}"))?;
        Ok(Self::new(MacAddress::new(mac), port))
    }
}

impl Serialize for PortKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PortKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// PoE state of one PoE-capable port on a PoE-capable switch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoePortState {
    pub switch_mac: MacAddress,
    pub switch_name: Option<String>,
    pub port: i64,
    pub port_name: String,
    pub poe_enabled: bool,
    /// Watts.
    pub power: f64,
    /// Volts.
    pub voltage: f64,
    /// Milliamps.
    pub current: f64,
    pub pd_class: Option<String>,
    pub display_type: Option<i64>,
    pub connected: bool,
}

/// PoE power budget of one switch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoeBudget {
    pub switch_mac: MacAddress,
    pub name: Option<String>,
    pub port_count: Option<i64>,
    /// Watts.
    pub total_power: f64,
    /// Watts.
    pub used_power: f64,
    pub used_percent: f64,
}

impl PoeBudget {
    pub fn remaining_power(&self) -> f64 {
        (self.total_power - self.used_power).max(0.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn port_key_round_trips_through_display() {
        let key = PortKey::new(MacAddress::new("aa:bb:cc:dd:ee:02"), 7);
        assert_eq!(key.to_string(), "AA-BB-CC-DD-EE-02_7");
        assert_eq!("AA-BB-CC-DD-EE-02_7".parse::<PortKey>().unwrap(), key);
    }

    #[test]
    fn budget_remaining_never_negative() {
        let budget = PoeBudget {
            switch_mac: MacAddress::new("AA-BB-CC-DD-EE-02"),
            name: None,
            port_count: Some(8),
            total_power: 60.0,
            used_power: 65.0,
            used_percent: 108.0,
        };
        assert!(budget.remaining_power().abs() < f64::EPSILON);
    }
}
