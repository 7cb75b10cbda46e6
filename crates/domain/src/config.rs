//! Environment-backed configuration.
//!
//! Everything the client needs is sourced from process environment
//! variables (with `.env` support via `dotenvy`). Loading is all-or-nothing:
//! every missing required variable is collected and reported in a single
//! [`Error::Config`] so an operator fixes the environment once, not
//! one variable at a time. No network call happens before loading succeeds.

use crate::error::{Error, Result};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Environment variable names
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub const ENV_CLIENT_ID: &str = "CONNECTED_APP_CLIENT_ID";
pub const ENV_SECRET: &str = "CONNECTED_APP_SECRET";
pub const ENV_SECRET_ID: &str = "CONNECTED_APP_SECRET_ID";
pub const ENV_USER: &str = "TABLEAU_USER";
pub const ENV_POD: &str = "TABLEAU_POD";
pub const ENV_API_VERSION: &str = "TABLEAU_API_VERSION";
pub const ENV_SITE: &str = "TABLEAU_SITE";
pub const ENV_PROJECTS: &str = "TABLEAU_PROJECTS";

pub const ENV_SCOPES: &str = "TABLEAU_SCOPES";
pub const ENV_TLS_VERIFY: &str = "TABLEAU_TLS_VERIFY";
pub const ENV_TIMEOUT_SECS: &str = "TABLEAU_TIMEOUT_SECS";

/// Scopes requested when `TABLEAU_SCOPES` is not set.
const DEFAULT_SCOPES: [&str; 3] = [
    "tableau:views:embed",
    "tableau:insights:embed",
    "tableau:content:read",
];

/// Default request timeout (seconds) for every platform call.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Types
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The pre-registered Connected App identity used to mint assertions.
///
/// `Debug` is manually implemented to redact the shared secret.
#[derive(Clone)]
pub struct ApplicationIdentity {
    /// Connected App client id — becomes the JWT `iss` claim and the
    /// `iss` header field.
    pub client_id: String,
    /// Symmetric signing secret. Never logged.
    pub shared_secret: String,
    /// Secret id — becomes the JWT `kid` header field so the platform
    /// selects the right verification key.
    pub secret_key_id: String,
    /// Platform user the assertion impersonates — the JWT `sub` claim.
    pub subject_user: String,
    /// Capability scopes embedded in the `scp` claim, in order.
    pub scopes: Vec<String>,
}

impl std::fmt::Debug for ApplicationIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApplicationIdentity")
            .field("client_id", &self.client_id)
            .field("shared_secret", &"[REDACTED]")
            .field("secret_key_id", &self.secret_key_id)
            .field("subject_user", &self.subject_user)
            .field("scopes", &self.scopes)
            .finish()
    }
}

/// Where and what to query once authenticated.
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    /// Pod host, e.g. `10ax.online.tableau.com`. Scheme-less.
    pub pod_host: String,
    /// REST API version segment, e.g. `3.22`.
    pub api_version: String,
    /// Site content URL (the site's URL namespace, not its LUID).
    pub site_content_url: String,
    /// Project names used to narrow workbook results. Validated at load
    /// time against the filter grammar (no `,`, `[`, `]`) because the
    /// serialized filter performs no escaping.
    pub projects: Vec<String>,
}

/// Full run configuration: identity, target platform, transport knobs.
#[derive(Debug, Clone)]
pub struct Config {
    pub identity: ApplicationIdentity,
    pub platform: PlatformConfig,
    /// TLS certificate verification. Defaults to on; turning it off is an
    /// explicit operator decision and is logged as a warning at client
    /// construction.
    pub tls_verify: bool,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Loading
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

impl Config {
    /// Load configuration from the process environment (and `.env` if
    /// present).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] listing every missing required variable
    /// at once, or naming the first invalid value (bad project name,
    /// unparsable timeout).
    pub fn from_env() -> Result<Self> {
        // A missing .env file is fine; real environments set vars directly.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Split out from [`Config::from_env`] so tests can drive loading
    /// without mutating the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = [
            ENV_CLIENT_ID,
            ENV_SECRET,
            ENV_SECRET_ID,
            ENV_USER,
            ENV_POD,
            ENV_API_VERSION,
            ENV_SITE,
            ENV_PROJECTS,
        ];

        let mut values = std::collections::HashMap::new();
        let mut missing = Vec::new();
        for name in required {
            match lookup(name) {
                Some(v) if !v.trim().is_empty() => {
                    values.insert(name, v);
                }
                _ => missing.push(name),
            }
        }
        if !missing.is_empty() {
            return Err(Error::Config(format!(
                "missing required environment variables: {}",
                missing.join(", ")
            )));
        }

        let projects = split_list(&values[ENV_PROJECTS]);
        if projects.is_empty() {
            return Err(Error::Config(format!(
                "{ENV_PROJECTS} must name at least one project"
            )));
        }
        for name in &projects {
            if name.contains(['[', ']']) {
                return Err(Error::Config(format!(
                    "project name '{name}' contains characters that break \
                     the filter grammar ('[' or ']')"
                )));
            }
        }

        let scopes = match lookup(ENV_SCOPES) {
            Some(raw) if !raw.trim().is_empty() => split_list(&raw),
            _ => DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect(),
        };

        let tls_verify = match lookup(ENV_TLS_VERIFY).as_deref() {
            None | Some("") => true,
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                other => {
                    return Err(Error::Config(format!(
                        "{ENV_TLS_VERIFY} must be a boolean, got '{other}'"
                    )));
                }
            },
        };

        let timeout_secs = match lookup(ENV_TIMEOUT_SECS) {
            Some(raw) if !raw.trim().is_empty() => {
                raw.trim().parse::<u64>().map_err(|_| {
                    Error::Config(format!(
                        "{ENV_TIMEOUT_SECS} must be an integer number of \
                         seconds, got '{raw}'"
                    ))
                })?
            }
            _ => DEFAULT_TIMEOUT_SECS,
        };

        let mut take = |name: &str| values.remove(name).unwrap_or_default();

        Ok(Config {
            identity: ApplicationIdentity {
                client_id: take(ENV_CLIENT_ID),
                shared_secret: take(ENV_SECRET),
                secret_key_id: take(ENV_SECRET_ID),
                subject_user: take(ENV_USER),
                scopes,
            },
            platform: PlatformConfig {
                pod_host: take(ENV_POD),
                api_version: take(ENV_API_VERSION),
                site_content_url: take(ENV_SITE),
                projects,
            },
            tls_verify,
            timeout_secs,
        })
    }
}

/// Split a comma-separated list, trimming whitespace and dropping empties.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
