//! The authenticated session context.

/// Immutable credential context produced by one sign-in exchange and
/// carried by every subsequent platform call.
///
/// Held only in memory for the duration of the run; never persisted.
/// `Debug` is manually implemented to redact the session token.
#[derive(Clone)]
pub struct SessionContext {
    /// Short-lived credential returned by sign-in. Never logged.
    pub session_token: String,
    /// Platform-assigned site LUID scoping all resource-listing calls.
    pub site_id: String,
    /// Pod host all calls in this session target.
    pub pod_host: String,
    /// REST API version segment for versioned endpoints.
    pub api_version: String,
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("session_token", &"[REDACTED]")
            .field("site_id", &self.site_id)
            .field("pod_host", &self.pod_host)
            .field("api_version", &self.api_version)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_session_token() {
        let ctx = SessionContext {
            session_token: "tok-sensitive".into(),
            site_id: "site-1".into(),
            pod_host: "pod.example.com".into(),
            api_version: "3.22".into(),
        };
        let rendered = format!("{ctx:?}");
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("tok-sensitive"));
        assert!(rendered.contains("site-1"));
    }
}
