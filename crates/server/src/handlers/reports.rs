//! Dashboard and productivity endpoints.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

use board::{AdminDashboard, DepartmentProductivity};

use super::require_principal;
use crate::error::ApiResult;
use crate::server::ServerState;

pub async fn admin_dashboard(
    State(state): State<ServerState>,
    headers: HeaderMap,
) -> ApiResult<Json<AdminDashboard>> {
    let caller = require_principal(&state, &headers)?;
    Ok(Json(state.reports.admin_dashboard(&caller).await?))
}

pub async fn department_productivity(
    State(state): State<ServerState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<DepartmentProductivity>>> {
    let caller = require_principal(&state, &headers)?;
    Ok(Json(
        state.reports.department_productivity(&caller).await?,
    ))
}
