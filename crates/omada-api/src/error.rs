use thiserror::Error;

/// Top-level error type for the `omada-api` crate.
///
/// Covers every failure mode of the Open API surface: the token chain,
/// transport, the `{errorCode, msg, result}` envelope, and decoding.
/// `omada-core` maps these into domain errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The credential chain is broken: the refresh token was rejected and
    /// re-issuing from the client credentials failed too. Needs an operator.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// A resource call was still rejected as unauthorized after one forced
    /// token refresh and one retry.
    #[error("Access token rejected after refresh: {message}")]
    TokenRejected { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// Non-200 HTTP status that is not an authorization failure.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    // ── Open API ────────────────────────────────────────────────────
    /// Non-zero `errorCode` in an otherwise successful response.
    #[error("Omada API error {code}: {message}")]
    Api { code: i64, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` when the static client credentials themselves are
    /// no longer accepted and automatic recovery has been exhausted.
    pub fn is_credential_failure(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Returns `true` if this is a transient error worth retrying on the
    /// next poll tick.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Http { status, .. } => *status >= 500,
            Self::TokenRejected { .. } => true,
            _ => false,
        }
    }

    /// Returns `true` if this is a transport-level timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Http { status: 404, .. })
    }

    /// Extract the controller's `errorCode`, if available.
    pub fn api_error_code(&self) -> Option<i64> {
        match self {
            Self::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}
