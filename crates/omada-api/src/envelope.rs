// Response envelope and error-code table for the Omada Open API
//
// Every response body is `{errorCode, msg, result}`. The controller reports
// token problems inside HTTP 200 bodies, so the retry decisions below are a
// pure function of (HTTP status, errorCode) and are checked before any
// generic error surfacing.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::Error;

// ── Error codes ─────────────────────────────────────────────────────

/// Known `errorCode` values returned by the controller.
pub mod codes {
    pub const OK: i64 = 0;
    /// Access token expired.
    pub const ACCESS_TOKEN_EXPIRED: i64 = -44112;
    /// Access token invalid (revoked, or rotated by another client).
    pub const ACCESS_TOKEN_INVALID: i64 = -44113;
    /// Refresh token expired.
    pub const REFRESH_TOKEN_EXPIRED: i64 = -44114;
    /// Grant type rejected by the token endpoint.
    pub const INVALID_GRANT_TYPE: i64 = -44111;
    /// Client id / secret pair rejected by the token endpoint.
    pub const INVALID_CLIENT_CREDENTIALS: i64 = -44106;
}

/// Codes on a resource call that mean "refresh the access token and retry".
pub const TRANSIENT_AUTH_CODES: &[i64] = &[codes::ACCESS_TOKEN_EXPIRED, codes::ACCESS_TOKEN_INVALID];

/// Codes on a `refresh_token` grant that mean "fall back to re-issue".
pub const REISSUE_CODES: &[i64] = &[
    codes::REFRESH_TOKEN_EXPIRED,
    codes::INVALID_GRANT_TYPE,
    codes::INVALID_CLIENT_CREDENTIALS,
];

// ── Classification ──────────────────────────────────────────────────

/// Outcome of one resource call, as seen by the request executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// The access token is no longer usable; one refresh + retry may fix it.
    TransientAuth,
    /// Anything else: surfaced to the caller as-is.
    Hard,
}

/// Classify a resource call from its HTTP status and envelope `errorCode`.
///
/// `code` is `None` when the body was not inspected (non-200 responses).
pub fn classify(status: u16, code: Option<i64>) -> Outcome {
    match (status, code) {
        (401, _) => Outcome::TransientAuth,
        (200, Some(codes::OK)) => Outcome::Success,
        (200, Some(c)) if TRANSIENT_AUTH_CODES.contains(&c) => Outcome::TransientAuth,
        _ => Outcome::Hard,
    }
}

/// Outcome of a `refresh_token` grant, as seen by the token manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Success,
    /// The refresh token cannot be used; re-issue from client credentials.
    Reissue,
    /// The token endpoint rejected the request for an unrelated reason.
    Fatal,
}

/// Classify a `refresh_token` grant response.
///
/// HTTP 401 and the "refresh token expired" family of codes are treated
/// as equivalent triggers: controllers are not consistent about which one
/// they send.
pub fn classify_refresh(status: u16, code: Option<i64>) -> RefreshOutcome {
    match (status, code) {
        (200, Some(codes::OK)) => RefreshOutcome::Success,
        (200, Some(c)) if REISSUE_CODES.contains(&c) => RefreshOutcome::Reissue,
        (200, _) => RefreshOutcome::Fatal,
        _ => RefreshOutcome::Reissue,
    }
}

// ── Wire types ──────────────────────────────────────────────────────

/// The `{errorCode, msg, result}` wrapper around every response.
///
/// `result` stays untyped until the code has been checked, so error bodies
/// whose `result` does not match the expected shape still classify.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub error_code: i64,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub result: serde_json::Value,
}

impl Envelope {
    /// Parse a raw body into an envelope.
    pub fn parse(body: &str) -> Result<Self, Error> {
        serde_json::from_str(body).map_err(|e| deserialization_error(&e, body))
    }

    /// The controller's message, or a placeholder.
    pub fn message(&self) -> String {
        self.msg
            .clone()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| "Unknown error".into())
    }

    /// Decode `result` into the caller's type.
    pub fn into_result<T: DeserializeOwned>(self) -> Result<T, Error> {
        T::deserialize(&self.result).map_err(|e| deserialization_error(&e, &self.result.to_string()))
    }
}

/// One page of a paginated listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(default)]
    pub total_rows: i64,
    #[serde(default)]
    pub current_page: i64,
    #[serde(default)]
    pub current_size: i64,
    #[serde(default)]
    pub data: Vec<T>,
}

fn deserialization_error(e: &serde_json::Error, body: &str) -> Error {
    let preview: String = body.chars().take(200).collect();
    Error::Deserialization {
        message: format!("{e} (body preview: {preview:?})"),
        body: body.to_owned(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn classify_is_driven_by_status_then_code() {
        assert_eq!(classify(200, Some(0)), Outcome::Success);
        assert_eq!(classify(401, None), Outcome::TransientAuth);
        assert_eq!(classify(200, Some(-44112)), Outcome::TransientAuth);
        assert_eq!(classify(200, Some(-44113)), Outcome::TransientAuth);
        assert_eq!(classify(200, Some(-1001)), Outcome::Hard);
        assert_eq!(classify(500, None), Outcome::Hard);
        assert_eq!(classify(403, None), Outcome::Hard);
    }

    #[test]
    fn refresh_token_expiry_accepts_either_signal() {
        assert_eq!(classify_refresh(401, None), RefreshOutcome::Reissue);
        assert_eq!(classify_refresh(200, Some(-44114)), RefreshOutcome::Reissue);
        assert_eq!(classify_refresh(200, Some(-44111)), RefreshOutcome::Reissue);
        assert_eq!(classify_refresh(200, Some(-44106)), RefreshOutcome::Reissue);
        assert_eq!(classify_refresh(502, None), RefreshOutcome::Reissue);
        assert_eq!(classify_refresh(200, Some(0)), RefreshOutcome::Success);
        assert_eq!(classify_refresh(200, Some(-1)), RefreshOutcome::Fatal);
    }

    #[test]
    fn envelope_with_mismatched_result_still_parses() {
        let env = Envelope::parse(r#"{"errorCode":-44112,"msg":"expired","result":"x"}"#).unwrap();
        assert_eq!(env.error_code, -44112);
        assert_eq!(env.message(), "expired");
    }

    #[test]
    fn page_defaults_missing_fields() {
        let env = Envelope::parse(r#"{"errorCode":0,"result":{"totalRows":3}}"#).unwrap();
        let page: Page<serde_json::Value> = env.into_result().unwrap();
        assert_eq!(page.total_rows, 3);
        assert!(page.data.is_empty());
    }

    #[test]
    fn page_of_records_without_default() {
        #[derive(Debug, Deserialize)]
        struct Named {
            name: String,
        }

        let env = Envelope::parse(
            r#"{"errorCode":0,"result":{"totalRows":1,"data":[{"name":"Main Office"}]}}"#,
        )
        .unwrap();
        let page: Page<Named> = env.into_result().unwrap();
        assert_eq!(page.data[0].name, "Main Office");

        let empty: Page<Named> = Envelope::parse(r#"{"errorCode":0,"result":{}}"#)
            .unwrap()
            .into_result()
            .unwrap();
        assert!(empty.data.is_empty());
    }

    #[test]
    fn bad_json_is_a_deserialization_error() {
        let err = Envelope::parse("<html>").unwrap_err();
        assert!(matches!(err, Error::Deserialization { .. }));
    }
}
