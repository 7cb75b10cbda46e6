/// Shared error type used across all tabconnect crates.
///
/// The variants mirror the failure taxonomy of the sign-in and content
/// protocols: configuration problems are fatal before any network call,
/// transport failures mean no response arrived at all, protocol failures
/// carry the platform's own status and body, and malformed/application
/// failures cover 2xx responses that are still unusable.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("config: {0}")]
    Config(String),

    #[error("transport: {0}")]
    Transport(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("{endpoint} returned HTTP {status}: {body}")]
    Protocol {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("{endpoint} returned a success status but {detail}")]
    Malformed { endpoint: String, detail: String },

    #[error("query-level errors in response: {0}")]
    Application(String),

    #[error("signing: {0}")]
    Signing(String),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Longest response body carried inside an error. Platform error pages can
/// be arbitrarily large; diagnostics only need the head.
const MAX_ERROR_BODY: usize = 2_048;

impl Error {
    /// Build a [`Error::Protocol`] with the body truncated to a bounded
    /// length so error messages stay printable.
    pub fn protocol(endpoint: impl Into<String>, status: u16, body: &str) -> Self {
        Error::Protocol {
            endpoint: endpoint.into(),
            status,
            body: truncate_body(body),
        }
    }

    /// True when the platform rejected the identity assertion itself
    /// (bad signature, expired, wrong audience, replayed `jti`), as
    /// opposed to a platform-side failure.
    pub fn is_auth_rejection(&self) -> bool {
        matches!(self, Error::Protocol { status: 401, .. })
    }
}

/// Truncate a response body on a char boundary, marking the cut.
pub fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}… [truncated {} bytes]", &body[..end], body.len() - end)
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_error_carries_status_and_body() {
        let err = Error::protocol("https://pod/api/3.22/auth/signin", 401, "Signin failed");
        match &err {
            Error::Protocol { status, body, .. } => {
                assert_eq!(*status, 401);
                assert_eq!(body, "Signin failed");
            }
            other => panic!("expected Protocol, got {other:?}"),
        }
        assert!(err.to_string().contains("401"));
        assert!(err.to_string().contains("auth/signin"));
    }

    #[test]
    fn auth_rejection_is_only_401() {
        assert!(Error::protocol("e", 401, "").is_auth_rejection());
        assert!(!Error::protocol("e", 500, "").is_auth_rejection());
        assert!(!Error::Transport("connection refused".into()).is_auth_rejection());
    }

    #[test]
    fn long_bodies_are_truncated() {
        let body = "x".repeat(10_000);
        let truncated = truncate_body(&body);
        assert!(truncated.len() < body.len());
        assert!(truncated.contains("[truncated"));
    }

    #[test]
    fn short_bodies_pass_through() {
        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        // Multi-byte chars straddling the cut point must not panic.
        let body = "é".repeat(4_000);
        let truncated = truncate_body(&body);
        assert!(truncated.contains("[truncated"));
    }
}
