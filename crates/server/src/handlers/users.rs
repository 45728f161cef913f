//! Profile and user administration endpoints.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};

use board::{
    AccountStatus, BoardError, Department, Principal, ProfileDraft, TaskView, UserProfile,
    UserRole, UserStats, UserSummary,
};

use super::require_principal;
use crate::error::{ApiError, ApiResult};
use crate::server::ServerState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveProfileRequest {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub department: Department,
    /// Honored at first registration; later changes require an admin.
    #[serde(default)]
    pub role: UserRole,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleResponse {
    pub role: UserRole,
    pub is_admin: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetRoleRequest {
    pub role: UserRole,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetStatusRequest {
    pub account_status: AccountStatus,
}

fn parse_principal(raw: &str) -> Result<Principal, ApiError> {
    Principal::new(raw).map_err(ApiError::from)
}

// ============================================================================
// Caller profile
// ============================================================================

pub async fn get_me(
    State(state): State<ServerState>,
    headers: HeaderMap,
) -> ApiResult<Json<UserProfile>> {
    let caller = require_principal(&state, &headers)?;
    let profile = state
        .directory
        .caller_profile(&caller)
        .await?
        .ok_or(BoardError::NotRegistered {
            principal: caller.to_string(),
        })?;
    Ok(Json(profile))
}

pub async fn save_profile(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(request): Json<SaveProfileRequest>,
) -> ApiResult<Json<UserProfile>> {
    let caller = require_principal(&state, &headers)?;
    let draft = ProfileDraft {
        name: request.name,
        email: request.email,
        department: request.department,
        role: request.role,
    };
    Ok(Json(state.directory.save_profile(&caller, draft).await?))
}

pub async fn my_role(
    State(state): State<ServerState>,
    headers: HeaderMap,
) -> ApiResult<Json<RoleResponse>> {
    let caller = require_principal(&state, &headers)?;
    let role = state
        .directory
        .caller_role(&caller)
        .await?
        .ok_or(BoardError::NotRegistered {
            principal: caller.to_string(),
        })?;
    Ok(Json(RoleResponse {
        role,
        is_admin: role.is_admin(),
    }))
}

// ============================================================================
// User administration
// ============================================================================

pub async fn all_user_stats(
    State(state): State<ServerState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<UserStats>>> {
    let caller = require_principal(&state, &headers)?;
    Ok(Json(state.directory.all_users_stats(&caller).await?))
}

pub async fn active_users(
    State(state): State<ServerState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<UserSummary>>> {
    let caller = require_principal(&state, &headers)?;
    Ok(Json(state.directory.active_users(&caller).await?))
}

pub async fn get_user(
    State(state): State<ServerState>,
    Path(principal): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Json<UserProfile>> {
    let caller = require_principal(&state, &headers)?;
    let subject = parse_principal(&principal)?;
    Ok(Json(state.directory.user_profile(&caller, &subject).await?))
}

pub async fn user_tasks(
    State(state): State<ServerState>,
    Path(principal): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<TaskView>>> {
    let caller = require_principal(&state, &headers)?;
    let subject = parse_principal(&principal)?;
    Ok(Json(state.flow.tasks_for_user(&caller, &subject).await?))
}

pub async fn set_user_role(
    State(state): State<ServerState>,
    Path(principal): Path<String>,
    headers: HeaderMap,
    Json(request): Json<SetRoleRequest>,
) -> ApiResult<Json<UserProfile>> {
    let caller = require_principal(&state, &headers)?;
    let subject = parse_principal(&principal)?;
    let profile = state
        .directory
        .update_user_role(&caller, &subject, request.role)
        .await?;
    Ok(Json(profile))
}

pub async fn set_account_status(
    State(state): State<ServerState>,
    Path(principal): Path<String>,
    headers: HeaderMap,
    Json(request): Json<SetStatusRequest>,
) -> ApiResult<Json<UserProfile>> {
    let caller = require_principal(&state, &headers)?;
    let subject = parse_principal(&principal)?;
    let profile = state
        .directory
        .set_account_status(&caller, &subject, request.account_status)
        .await?;
    Ok(Json(profile))
}

pub async fn delete_user(
    State(state): State<ServerState>,
    Path(principal): Path<String>,
    headers: HeaderMap,
) -> ApiResult<StatusCode> {
    let caller = require_principal(&state, &headers)?;
    let subject = parse_principal(&principal)?;
    state.directory.delete_user(&caller, &subject).await?;
    Ok(StatusCode::NO_CONTENT)
}
