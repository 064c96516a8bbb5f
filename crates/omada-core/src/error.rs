// ── Core error types ──
//
// Domain errors from omada-core. Consumers never see HTTP status codes or
// JSON parse failures directly; the `From<omada_api::Error>` impl
// translates transport-layer errors into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to controller at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    /// The credential chain is broken; new client credentials are needed.
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    /// The access token kept being rejected after a refresh.
    #[error("Access token rejected: {message}")]
    TokenRejected { message: String },

    #[error("Controller request timed out")]
    Timeout,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Site not found: {name}")]
    SiteNotFound { name: String },

    #[error("Resource not found: {detail}")]
    NotFound { detail: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// The controller's `errorCode`, when the body carried one.
        code: Option<i64>,
        /// HTTP status code, when the failure was a non-200 response.
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Returns `true` for the one failure class that automatic recovery
    /// cannot fix: the host should prompt for new credentials.
    pub fn requires_operator(&self) -> bool {
        matches!(self, Self::AuthenticationFailed { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<omada_api::Error> for CoreError {
    fn from(err: omada_api::Error) -> Self {
        match err {
            omada_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            omada_api::Error::TokenRejected { message } => CoreError::TokenRejected { message },
            omada_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                }
            }
            omada_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("invalid URL: {e}"),
            },
            omada_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            omada_api::Error::Http { status: 404, body } => CoreError::NotFound { detail: body },
            omada_api::Error::Http { status, body } => CoreError::Api {
                message: if body.is_empty() {
                    format!("HTTP {status}")
                } else {
                    body
                },
                code: None,
                status: Some(status),
            },
            omada_api::Error::Api { code, message } => CoreError::Api {
                message,
                code: Some(code),
                status: None,
            },
            omada_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_credential_failures_require_operator() {
        let auth: CoreError = omada_api::Error::Authentication {
            message: "client credentials rejected".into(),
        }
        .into();
        assert!(auth.requires_operator());

        let rejected: CoreError = omada_api::Error::TokenRejected {
            message: "HTTP 401".into(),
        }
        .into();
        assert!(!rejected.requires_operator());

        let api: CoreError = omada_api::Error::Api {
            code: -1005,
            message: "Operation forbidden.".into(),
        }
        .into();
        assert!(matches!(api, CoreError::Api { code: Some(-1005), .. }));
    }
}
