// ── MacAddress ──
//
// The Open API addresses devices and clients by MAC in URL paths using
// the `AA-BB-CC-DD-EE-FF` form, so that is the canonical map key.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// MAC address, normalized to uppercase dash-separated format (AA-BB-CC-DD-EE-FF).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MacAddress(String);

impl MacAddress {
    /// Create a normalized MAC address from any common format.
    /// Accepts colon-separated, dash-separated, dotted, or bare hex.
    pub fn new(raw: impl AsRef<str>) -> Self {
        let hex: String = raw
            .as_ref()
            .chars()
            .filter(char::is_ascii_hexdigit)
            .map(|c| c.to_ascii_uppercase())
            .collect();

        if hex.len() != 12 {
            // Not a 48-bit address; keep it usable as a key anyway.
            return Self(raw.as_ref().trim().to_uppercase().replace(':', "-"));
        }

        let pairs: Vec<&str> = (0..12)
            .step_by(2)
            .filter_map(|i| hex.get(i..i + 2))
            .collect();
        Self(pairs.join("-"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MacAddress {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn colon_and_dash_forms_share_a_key() {
        let a = MacAddress::new("aa:bb:cc:dd:ee:ff");
        let b = MacAddress::new("AA-BB-CC-DD-EE-FF");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "AA-BB-CC-DD-EE-FF");
    }

    #[test]
    fn bare_and_dotted_hex_normalize() {
        assert_eq!(MacAddress::new("aabbccddeeff").as_str(), "AA-BB-CC-DD-EE-FF");
        assert_eq!(MacAddress::new("aabb.ccdd.eeff").as_str(), "AA-BB-CC-DD-EE-FF");
    }

    #[test]
    fn mac_address_from_str() {
        let mac: MacAddress = "11:22:33:44:55:aa".parse().unwrap();
        assert_eq!(mac.to_string(), "11-22-33-44-55-AA");
    }

    #[test]
    fn malformed_input_is_kept_uppercase() {
        assert_eq!(MacAddress::new("ab:cd").as_str(), "AB-CD");
    }
}
