//! Shared helpers for command handlers.

use omada_core::{Controller, MacAddress, Site};

use crate::error::CliError;

/// The site a one-shot command targets: `--site`, else the profile's first
/// configured site, else the first site the controller lists.
pub async fn resolve_site(controller: &Controller) -> Result<Site, CliError> {
    if let Some(key) = controller.config().sites.first() {
        return Ok(controller.find_site(key).await?);
    }
    controller
        .list_sites()
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| CliError::NotFound {
            resource_type: "site".into(),
            identifier: "(any)".into(),
            list_command: "sites".into(),
        })
}

/// Parse a MAC argument, rejecting anything that is not 48 bits.
pub fn parse_mac(raw: &str) -> Result<MacAddress, CliError> {
    if raw.chars().filter(char::is_ascii_hexdigit).count() == 12 {
        Ok(MacAddress::new(raw))
    } else {
        Err(CliError::Validation {
            field: "mac".into(),
            reason: format!("not a MAC address: {raw}"),
        })
    }
}

/// Report a completed action on stderr unless `--quiet`.
pub fn done(message: &str, quiet: bool) {
    if !quiet {
        eprintln!("{message}");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn mac_arguments_normalize() {
        assert_eq!(
            parse_mac("aa:bb:cc:dd:ee:ff").unwrap().as_str(),
            "AA-BB-CC-DD-EE-FF"
        );
        assert!(matches!(parse_mac("aa:bb"), Err(CliError::Validation { .. })));
    }
}
