//! One full authenticate-then-query cycle against the platform:
//! sign an identity assertion, exchange it for a session, run the
//! metadata content query, then list workbooks over the REST surface.

mod queries;

use chrono::Utc;
use tracing_subscriber::EnvFilter;

use tc_client::rest::DEFAULT_PAGE_SIZE;
use tc_domain::config::Config;

fn main() -> anyhow::Result<()> {
    // ── Tracing ────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tabconnect=info,tc_client=info")),
        )
        .init();

    tracing::info!("tabconnect starting");

    // ── Config ─────────────────────────────────────────────────────
    // Fails before any network call, naming every missing variable.
    let config = Config::from_env()?;
    tracing::info!(
        pod = %config.platform.pod_host,
        api_version = %config.platform.api_version,
        site = %config.platform.site_content_url,
        projects = ?config.platform.projects,
        tls_verify = config.tls_verify,
        "configuration loaded"
    );

    // ── Sign and exchange ──────────────────────────────────────────
    let client = tc_client::build_http_client(config.tls_verify, config.timeout_secs)?;
    let assertion = tc_client::sign(&config.identity, Utc::now())?;

    let ctx = tc_client::sign_in(&client, &assertion, &config.platform).map_err(|e| {
        if e.is_auth_rejection() {
            tracing::error!(
                error = %e,
                "the platform rejected the identity assertion — check the \
                 Connected App secret, client id, subject user, and clock"
            );
        }
        e
    })?;

    // ── Metadata query ─────────────────────────────────────────────
    let variables = serde_json::json!({
        "tableau_site": config.platform.site_content_url,
        "tableau_projects": config.platform.projects,
    });
    let content = tc_client::query_content(&client, &ctx, queries::CONTENT_QUERY, &variables)?;
    println!("{}", serde_json::to_string_pretty(&content)?);

    // ── Workbook listing ───────────────────────────────────────────
    let workbooks = tc_client::list_all_workbooks(
        &client,
        &ctx,
        &config.platform.projects,
        DEFAULT_PAGE_SIZE,
    )?;
    tracing::info!(count = workbooks.len(), "retrieved workbooks");
    for wb in &workbooks {
        let project = wb
            .project
            .as_ref()
            .and_then(|p| p.name.as_deref())
            .unwrap_or("-");
        println!("{}\t{}\t{}", wb.id, project, wb.name);
    }

    Ok(())
}
