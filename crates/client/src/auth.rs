//! Sign-in: exchange a signed assertion for a session credential.
//!
//! One synchronous POST to `auth/signin`. On success the platform
//! returns the short-lived session token plus the LUID of the site the
//! session is scoped to; both go into the [`SessionContext`] every later
//! call carries. A failed exchange is terminal for the run; nothing
//! downstream executes without a valid context.

use serde::Deserialize;
use serde_json::json;

use tc_domain::config::PlatformConfig;
use tc_domain::error::{Error, Result};
use tc_domain::session::SessionContext;

use crate::util::{from_reqwest, read_response};

/// Versioned sign-in endpoint path.
const AUTH_ENDPOINT: &str = "auth/signin";

// Response shape. Every field is optional so a structurally wrong 2xx
// body surfaces as a malformed-response error naming the missing key,
// not as a JSON parse failure.
#[derive(Debug, Deserialize)]
struct SignInEnvelope {
    credentials: Option<SignInCredentials>,
}

#[derive(Debug, Deserialize)]
struct SignInCredentials {
    token: Option<String>,
    site: Option<SignInSite>,
}

#[derive(Debug, Deserialize)]
struct SignInSite {
    id: Option<String>,
}

fn signin_url(platform: &PlatformConfig) -> String {
    format!(
        "https://{}/api/{}/{AUTH_ENDPOINT}",
        platform.pod_host, platform.api_version
    )
}

/// Request body: `{credentials: {jwt, site: {contentUrl}}}`.
fn signin_body(assertion: &str, site_content_url: &str) -> serde_json::Value {
    json!({
        "credentials": {
            "jwt": assertion,
            "site": { "contentUrl": site_content_url }
        }
    })
}

/// Exchange `assertion` for a [`SessionContext`].
///
/// Single attempt, no retry. A 401 means the platform rejected the
/// assertion itself; [`Error::is_auth_rejection`] lets callers surface
/// that distinctly from platform-side failures.
pub fn sign_in(
    client: &reqwest::blocking::Client,
    assertion: &str,
    platform: &PlatformConfig,
) -> Result<SessionContext> {
    let url = signin_url(platform);
    tracing::debug!(url = %url, site = %platform.site_content_url, "signing in");

    let resp = client
        .post(&url)
        .header("Accept", "application/json")
        .json(&signin_body(assertion, &platform.site_content_url))
        .send()
        .map_err(from_reqwest)?;
    let (status, body) = read_response(resp)?;

    let ctx = parse_signin_response(&url, status, &body, platform)?;
    tracing::info!(site_id = %ctx.site_id, "sign-in succeeded");
    Ok(ctx)
}

/// Classify a completed sign-in exchange.
///
/// Separated from the transport so the status/body contract is testable
/// without a live platform.
fn parse_signin_response(
    endpoint: &str,
    status: u16,
    body: &str,
    platform: &PlatformConfig,
) -> Result<SessionContext> {
    if !(200..300).contains(&status) {
        return Err(Error::protocol(endpoint, status, body));
    }

    let envelope: SignInEnvelope = serde_json::from_str(body).map_err(|e| Error::Malformed {
        endpoint: endpoint.to_string(),
        detail: format!("the body is not valid JSON: {e}"),
    })?;

    let malformed = |missing: &str| Error::Malformed {
        endpoint: endpoint.to_string(),
        detail: format!("the body is missing '{missing}'"),
    };

    let credentials = envelope.credentials.ok_or_else(|| malformed("credentials"))?;
    let session_token = credentials.token.ok_or_else(|| malformed("credentials.token"))?;
    let site_id = credentials
        .site
        .and_then(|s| s.id)
        .ok_or_else(|| malformed("credentials.site.id"))?;

    Ok(SessionContext {
        session_token,
        site_id,
        pod_host: platform.pod_host.clone(),
        api_version: platform.api_version.clone(),
    })
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
