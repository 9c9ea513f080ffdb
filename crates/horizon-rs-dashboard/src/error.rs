//! Error types for dashboard helpers.

use crate::api::ApiError;
use horizon_rs_config::ConfigError;
use thiserror::Error;

/// Errors returned by dashboard helpers.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// The backend rejected the user's credentials.
    #[error("not authorized: {0}")]
    NotAuthorized(String),
    /// Backend failure that no exception category covers.
    #[error("api error: {0}")]
    Api(#[from] ApiError),
    /// Settings could not be loaded.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    /// Password validator pattern failed to compile.
    #[error("regex error: {0}")]
    Regex(String),
}
