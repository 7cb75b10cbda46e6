//! REST (resource-listing) content calls.
//!
//! GETs `sites/{site_id}/workbooks` with pagination and a
//! `projectName:in:[...]` filter. The filter grammar performs no
//! escaping — project names are validated against it at configuration
//! load, before any call is made.

use serde::Deserialize;

use tc_domain::error::{Error, Result};
use tc_domain::session::SessionContext;

use crate::metadata::AUTH_HEADER;
use crate::util::{from_reqwest, read_response};

/// Page size used by [`list_all_workbooks`] callers that have no
/// preference; the platform default.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Types
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Pagination window for a single listing call. Page numbers are
/// 1-based, matching the platform contract.
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub size: u32,
    pub number: u32,
}

/// One workbook as returned by the listing call. Platform fields the
/// caller does not need are dropped on deserialization.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkbookSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub content_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub project: Option<ProjectRef>,
}

/// Project a workbook belongs to.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectRef {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

// Response shape: `{"workbooks": {"workbook": [...]}}`. The platform
// omits the inner `workbook` array entirely when a page is empty, so it
// defaults; a missing outer `workbooks` key is a malformed response.
#[derive(Debug, Deserialize)]
struct WorkbooksEnvelope {
    workbooks: Option<WorkbooksBody>,
}

#[derive(Debug, Deserialize)]
struct WorkbooksBody {
    #[serde(default)]
    workbook: Vec<WorkbookSummary>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Calls
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn workbooks_url(ctx: &SessionContext) -> String {
    format!(
        "https://{}/api/{}/sites/{}/workbooks",
        ctx.pod_host, ctx.api_version, ctx.site_id
    )
}

/// Serialize the project constraint: `projectName:in:[p1,p2,...]`.
///
/// Names are joined verbatim — the grammar has no escape mechanism, so
/// names containing `,`, `[` or `]` must never reach this point.
pub fn project_filter(projects: &[String]) -> String {
    format!("projectName:in:[{}]", projects.join(","))
}

/// Fetch exactly one page of workbooks in the given projects.
pub fn list_workbooks(
    client: &reqwest::blocking::Client,
    ctx: &SessionContext,
    projects: &[String],
    page: Page,
) -> Result<Vec<WorkbookSummary>> {
    let url = workbooks_url(ctx);
    tracing::debug!(
        url = %url,
        page_size = page.size,
        page_number = page.number,
        "listing workbooks"
    );

    let resp = client
        .get(&url)
        .header(AUTH_HEADER, &ctx.session_token)
        .header("Accept", "application/json")
        .query(&[
            ("pageSize", page.size.to_string()),
            ("pageNumber", page.number.to_string()),
            ("filter", project_filter(projects)),
        ])
        .send()
        .map_err(from_reqwest)?;
    let (status, body) = read_response(resp)?;

    parse_workbooks_response(&url, status, &body)
}

/// Fetch every page of workbooks in the given projects, in order.
///
/// Continues while returned pages are full; the page that comes back
/// short ends the walk. The platform reports no total count on this
/// surface, so fullness is the only termination signal. A `page_size`
/// of zero falls back to [`DEFAULT_PAGE_SIZE`].
pub fn list_all_workbooks(
    client: &reqwest::blocking::Client,
    ctx: &SessionContext,
    projects: &[String],
    page_size: u32,
) -> Result<Vec<WorkbookSummary>> {
    fetch_all_pages(page_size, |page| list_workbooks(client, ctx, projects, page))
}

/// The aggregation walk behind [`list_all_workbooks`], driving an
/// arbitrary page fetcher.
fn fetch_all_pages(
    page_size: u32,
    mut fetch: impl FnMut(Page) -> Result<Vec<WorkbookSummary>>,
) -> Result<Vec<WorkbookSummary>> {
    // A zero size would make every page look full and the walk endless.
    let size = if page_size == 0 {
        DEFAULT_PAGE_SIZE
    } else {
        page_size
    };
    let mut all = Vec::new();
    let mut number = 1;
    loop {
        let page = fetch(Page { size, number })?;
        let full = page.len() as u32 >= size;
        all.extend(page);
        if !full {
            return Ok(all);
        }
        number += 1;
    }
}

/// Classify a completed listing exchange.
fn parse_workbooks_response(
    endpoint: &str,
    status: u16,
    body: &str,
) -> Result<Vec<WorkbookSummary>> {
    if !(200..300).contains(&status) {
        return Err(Error::protocol(endpoint, status, body));
    }

    let envelope: WorkbooksEnvelope = serde_json::from_str(body).map_err(|e| Error::Malformed {
        endpoint: endpoint.to_string(),
        detail: format!("the body is not valid JSON: {e}"),
    })?;

    let workbooks = envelope.workbooks.ok_or_else(|| Error::Malformed {
        endpoint: endpoint.to_string(),
        detail: "the body is missing 'workbooks'".to_string(),
    })?;

    Ok(workbooks.workbook)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
