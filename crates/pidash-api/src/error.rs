use thiserror::Error;

/// Top-level error type for the `pidash-api` crate.
///
/// The metrics client swallows these into `None` at its public boundary;
/// the control client surfaces them so the power sequencer can show the
/// failure detail to the user.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),

    // ── Responses ───────────────────────────────────────────────────
    /// Non-success HTTP status.
    #[error("HTTP {status}: {reason}")]
    Status { status: u16, reason: String },

    /// JSON deserialization failed.
    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

impl Error {
    /// Build a `Status` error from a reqwest status code.
    pub(crate) fn from_status(status: reqwest::StatusCode) -> Self {
        Self::Status {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_owned(),
        }
    }

    /// Returns `true` if the remote end could not be reached at all.
    pub fn is_unreachable(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_connect() || e.is_timeout(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_uses_canonical_reason() {
        let err = Error::from_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "HTTP 500: Internal Server Error");
        assert!(!err.is_unreachable());
    }
}
