//! Shared domain types for the tabconnect workspace: configuration,
//! session context, and the common error taxonomy.

pub mod config;
pub mod error;
pub mod session;

pub use config::{ApplicationIdentity, Config, PlatformConfig};
pub use error::{Error, Result};
pub use session::SessionContext;
