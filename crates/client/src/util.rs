//! Shared HTTP plumbing for all platform calls.

use std::time::Duration;

use tc_domain::error::{Error, Result};

/// Convert a [`reqwest::Error`] into the domain [`Error`] type.
///
/// Timeout errors map to [`Error::Timeout`]; everything else that
/// prevented a response maps to [`Error::Transport`].
pub(crate) fn from_reqwest(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Timeout(e.to_string())
    } else {
        Error::Transport(e.to_string())
    }
}

/// Build the blocking HTTP client shared by every call in one run.
///
/// Certificate verification defaults to on; disabling it is an explicit
/// operator opt-out surfaced here, once, for all call paths.
pub fn build_http_client(tls_verify: bool, timeout_secs: u64) -> Result<reqwest::blocking::Client> {
    if !tls_verify {
        tracing::warn!("TLS certificate verification is DISABLED for all platform calls");
    }
    reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .danger_accept_invalid_certs(!tls_verify)
        .build()
        .map_err(|e| Error::Transport(format!("building HTTP client: {e}")))
}

/// Drain a response into (status, body), mapping read failures to
/// transport errors.
pub(crate) fn read_response(resp: reqwest::blocking::Response) -> Result<(u16, String)> {
    let status = resp.status().as_u16();
    let body = resp.text().map_err(from_reqwest)?;
    Ok((status, body))
}
