//! Connected-App protocol client for the Tableau platform.
//!
//! The pieces compose strictly in order: [`assertion::sign`] mints a
//! signed identity assertion, [`auth::sign_in`] exchanges it for a
//! [`tc_domain::SessionContext`], and the [`metadata`] / [`rest`] modules
//! issue authenticated content calls with that context. No component
//! depends on one later in the chain.

pub mod assertion;
pub mod auth;
pub mod metadata;
pub mod rest;
pub(crate) mod util;

pub use assertion::sign;
pub use auth::sign_in;
pub use metadata::query_content;
pub use rest::{list_all_workbooks, list_workbooks, Page, WorkbookSummary};
pub use util::build_http_client;
