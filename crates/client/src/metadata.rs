//! Metadata (GraphQL) content queries.
//!
//! Single POST to `api/metadata/graphql` — note the endpoint is not
//! versioned, unlike the REST surface. The GraphQL protocol reports
//! query-level failures inside a 200 body, so a success status alone
//! proves nothing: any top-level `errors` array is classified as an
//! application-level error here, before the document reaches the caller.

use serde_json::Value;

use tc_domain::error::{Error, Result};
use tc_domain::session::SessionContext;

use crate::util::{from_reqwest, read_response};

/// Unversioned metadata endpoint path.
const METADATA_ENDPOINT: &str = "metadata/graphql";

/// Session token header used on all authenticated calls.
pub(crate) const AUTH_HEADER: &str = "X-tableau-auth";

fn metadata_url(pod_host: &str) -> String {
    format!("https://{pod_host}/api/{METADATA_ENDPOINT}")
}

/// Run a GraphQL query against the metadata surface.
///
/// Returns the parsed response document. Fails with
/// [`Error::Application`] if the document carries an `errors` array even
/// though the HTTP layer reported success.
pub fn query_content(
    client: &reqwest::blocking::Client,
    ctx: &SessionContext,
    query: &str,
    variables: &Value,
) -> Result<Value> {
    let url = metadata_url(&ctx.pod_host);
    tracing::debug!(url = %url, "running metadata query");

    let resp = client
        .post(&url)
        .header(AUTH_HEADER, &ctx.session_token)
        .json(&serde_json::json!({ "query": query, "variables": variables }))
        .send()
        .map_err(from_reqwest)?;
    let (status, body) = read_response(resp)?;

    classify_query_response(&url, status, &body)
}

/// Classify a completed metadata exchange: non-2xx is a protocol error,
/// unparsable 2xx is malformed, 2xx with `errors` is application-level.
fn classify_query_response(endpoint: &str, status: u16, body: &str) -> Result<Value> {
    if !(200..300).contains(&status) {
        return Err(Error::protocol(endpoint, status, body));
    }

    let document: Value = serde_json::from_str(body).map_err(|e| Error::Malformed {
        endpoint: endpoint.to_string(),
        detail: format!("the body is not valid JSON: {e}"),
    })?;

    if let Some(errors) = document.get("errors") {
        if errors.as_array().map_or(true, |a| !a.is_empty()) {
            return Err(Error::Application(tc_domain::error::truncate_body(
                &errors.to_string(),
            )));
        }
    }

    Ok(document)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
