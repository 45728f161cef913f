//! Task endpoints: creation, reads, proof upload/download, completion, review.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use board::{Department, Principal, ReviewDecision, TaskDraft, TaskPriority, TaskView};

use super::require_principal;
use crate::error::{ApiError, ApiResult};
use crate::server::ServerState;

// ============================================================================
// Request/Response types
// ============================================================================

/// Body for task creation. Exactly one of `assignedTo` / `assigneeEmail`
/// names the assignee; points are derived from the priority server-side.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: String,
    pub department: Department,
    pub priority: TaskPriority,
    /// RFC 3339.
    pub deadline: DateTime<Utc>,
    #[serde(default)]
    pub assigned_to: Option<Principal>,
    #[serde(default)]
    pub assignee_email: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskResponse {
    pub task_id: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub decision: ReviewDecision,
    /// Required when rejecting.
    #[serde(default)]
    pub comment: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn create_task(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(request): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<CreateTaskResponse>)> {
    let caller = require_principal(&state, &headers)?;
    let draft = TaskDraft {
        title: request.title,
        description: request.description,
        department: request.department,
        priority: request.priority,
        deadline: request.deadline,
        assigned_to: request.assigned_to,
        assignee_email: request.assignee_email,
    };
    let task_id = state.flow.create_task(&caller, draft).await?;
    Ok((StatusCode::CREATED, Json(CreateTaskResponse { task_id })))
}

pub async fn all_tasks(
    State(state): State<ServerState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<TaskView>>> {
    let caller = require_principal(&state, &headers)?;
    Ok(Json(state.flow.all_tasks(&caller).await?))
}

pub async fn my_tasks(
    State(state): State<ServerState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<TaskView>>> {
    let caller = require_principal(&state, &headers)?;
    Ok(Json(state.flow.tasks_for_caller(&caller).await?))
}

pub async fn get_task(
    State(state): State<ServerState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> ApiResult<Json<TaskView>> {
    let caller = require_principal(&state, &headers)?;
    Ok(Json(state.flow.get_task(&caller, id).await?))
}

/// Upload the proof bytes for a task. The request body is the file itself;
/// its type comes from `Content-Type` and its name from `x-proof-filename`.
pub async fn upload_proof(
    State(state): State<ServerState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<TaskView>> {
    let caller = require_principal(&state, &headers)?;
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();
    let filename = headers
        .get("x-proof-filename")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::bad_request("Missing 'x-proof-filename' header"))?
        .to_string();

    let view = state
        .flow
        .attach_proof(&caller, id, &filename, &content_type, &body)
        .await?;
    Ok(Json(view))
}

pub async fn download_proof(
    State(state): State<ServerState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let caller = require_principal(&state, &headers)?;
    let (proof, bytes) = state.flow.proof_blob(&caller, id).await?;

    let disposition = format!("attachment; filename=\"{}\"", proof.filename);
    Ok((
        [
            (header::CONTENT_TYPE, proof.content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

pub async fn mark_complete(
    State(state): State<ServerState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> ApiResult<Json<TaskView>> {
    let caller = require_principal(&state, &headers)?;
    Ok(Json(state.flow.mark_complete(&caller, id).await?))
}

pub async fn review_task(
    State(state): State<ServerState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
    Json(request): Json<ReviewRequest>,
) -> ApiResult<Json<TaskView>> {
    let caller = require_principal(&state, &headers)?;
    let view = state
        .flow
        .review_task(&caller, id, request.decision, request.comment)
        .await?;
    Ok(Json(view))
}
