//! Route modules for the API server
//!
//! - reports: the four report endpoints
//! - records: creation of budgets, expenses and incomes

pub mod records;
pub mod reports;

use axum::http::HeaderMap;
use ledgerlens_core::OwnerId;

use crate::{ApiError, AppState};

/// Owner id placed in the request by the identity layer
pub(crate) fn owner_id(state: &AppState, headers: &HeaderMap) -> Result<OwnerId, ApiError> {
    let header = state.config.server.owner_header.as_str();
    let raw = headers
        .get(header)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized {
            message: format!("missing {} header", header),
        })?;

    raw.trim().parse::<OwnerId>().map_err(|_| ApiError::Unauthorized {
        message: format!("{} header is not a valid owner id", header),
    })
}
