//! Request handlers.

pub mod reports;
pub mod tasks;
pub mod users;

use axum::http::HeaderMap;

use board::Principal;

use crate::error::ApiError;
use crate::server::ServerState;

/// Resolve the caller from the gateway-injected identity header.
pub(crate) fn require_principal(
    state: &ServerState,
    headers: &HeaderMap,
) -> Result<Principal, ApiError> {
    let header = &state.config.principal_header;
    let Some(value) = headers.get(header) else {
        return Err(ApiError::unauthorized(format!(
            "Missing identity header '{header}'"
        )));
    };
    let value = value.to_str().map_err(|_| {
        ApiError::unauthorized(format!("Identity header '{header}' is not valid UTF-8"))
    })?;
    Principal::new(value)
        .map_err(|_| ApiError::unauthorized(format!("Identity header '{header}' is malformed")))
}
