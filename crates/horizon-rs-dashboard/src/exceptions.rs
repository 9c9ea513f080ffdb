//! Backend error handling driven by the configured exception categories.

use crate::api::ApiError;
use crate::error::DashboardError;
use crate::request::Request;
use horizon_rs_config::ExceptionsConfig;
use log::{error, warn};

/// How the dashboard reacts to a backend error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Credentials are no longer valid; the user must log in again.
    Unauthorized,
    /// The requested resource is gone; show a message and carry on.
    NotFound,
    /// Transient or user-correctable failure; show a message and carry on.
    Recoverable,
    /// Not covered by any category; propagate.
    Unhandled,
}

/// Map an error kind onto its configured category.
///
/// Categories are checked in the order unauthorized, not found, recoverable.
pub fn classify(kind: &str, exceptions: &ExceptionsConfig) -> ErrorCategory {
    let contains = |entries: &[String]| entries.iter().any(|entry| entry == kind);
    if contains(&exceptions.unauthorized) {
        ErrorCategory::Unauthorized
    } else if contains(&exceptions.not_found) {
        ErrorCategory::NotFound
    } else if contains(&exceptions.recoverable) {
        ErrorCategory::Recoverable
    } else {
        ErrorCategory::Unhandled
    }
}

/// Record a backend failure on the request.
///
/// Not-found and recoverable errors queue `user_message` and return the
/// category so the caller can fall back to an empty result. Unauthorized
/// errors queue a message and fail with [`DashboardError::NotAuthorized`];
/// anything else is returned unchanged as [`DashboardError::Api`].
pub fn handle(
    request: &mut Request,
    err: ApiError,
    user_message: &str,
) -> Result<ErrorCategory, DashboardError> {
    let category = classify(&err.kind, &request.config().config().exceptions);
    match category {
        ErrorCategory::Unauthorized => {
            warn!(
                "unauthorized backend response (tenant={}, error={})",
                request.tenant_id, err
            );
            request
                .messages
                .error(format!("Unauthorized: {user_message}"));
            Err(DashboardError::NotAuthorized(err.message))
        }
        ErrorCategory::NotFound | ErrorCategory::Recoverable => {
            warn!(
                "handled backend error (category={:?}, error={})",
                category, err
            );
            request.messages.error(user_message);
            Ok(category)
        }
        ErrorCategory::Unhandled => {
            error!("unhandled backend error (error={err})");
            Err(DashboardError::Api(err))
        }
    }
}
