//! Typed client for the Taskdesk HTTP API.

use std::env;

use anyhow::{bail, Context, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use board::{
    AccountStatus, AdminDashboard, DepartmentProductivity, TaskView, UserProfile, UserRole,
    UserStats, UserSummary,
};

const DEFAULT_PRINCIPAL_HEADER: &str = "x-auth-principal";

/// The caller's role as reported by the API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleInfo {
    pub role: UserRole,
    pub is_admin: bool,
}

/// Error body the API returns on failures.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[allow(dead_code)]
    error: String,
    message: String,
}

/// HTTP client carrying the base URL and the caller identity header.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client acting as `principal`. The identity header name comes
    /// from `TASKDESK_PRINCIPAL_HEADER` when the gateway uses a custom one.
    pub fn new(base_url: &str, principal: &str) -> Result<Self> {
        let header_name = env::var("TASKDESK_PRINCIPAL_HEADER")
            .unwrap_or_else(|_| DEFAULT_PRINCIPAL_HEADER.to_string());

        let mut headers = HeaderMap::new();
        let name: HeaderName = header_name
            .parse()
            .with_context(|| format!("Invalid identity header name '{header_name}'"))?;
        let value: HeaderValue = principal
            .parse()
            .with_context(|| format!("Invalid principal '{principal}'"))?;
        headers.insert(name, value);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turn a failed response into an error carrying the server's message.
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.message,
            Err(_) => format!("request failed with status {status}"),
        };
        debug!(%status, "API request failed");
        bail!("{message}")
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.http.get(self.url(path)).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    // ------------------------------------------------------------------
    // Tasks
    // ------------------------------------------------------------------

    pub async fn my_tasks(&self) -> Result<Vec<TaskView>> {
        self.get_json("/api/tasks/mine").await
    }

    pub async fn all_tasks(&self) -> Result<Vec<TaskView>> {
        self.get_json("/api/tasks").await
    }

    pub async fn user_tasks(&self, principal: &str) -> Result<Vec<TaskView>> {
        self.get_json(&format!("/api/users/{principal}/tasks")).await
    }

    pub async fn get_task(&self, id: u64) -> Result<TaskView> {
        self.get_json(&format!("/api/tasks/{id}")).await
    }

    pub async fn create_task(&self, body: &Value) -> Result<u64> {
        let response = self
            .http
            .post(self.url("/api/tasks"))
            .json(body)
            .send()
            .await?;
        let body: Value = Self::check(response).await?.json().await?;
        body["taskId"]
            .as_u64()
            .context("Response is missing 'taskId'")
    }

    pub async fn upload_proof(
        &self,
        id: u64,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<TaskView> {
        let response = self
            .http
            .put(self.url(&format!("/api/tasks/{id}/proof")))
            .header("content-type", content_type)
            .header("x-proof-filename", filename)
            .body(bytes)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn mark_complete(&self, id: u64) -> Result<TaskView> {
        let response = self
            .http
            .post(self.url(&format!("/api/tasks/{id}/complete")))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn review_task(
        &self,
        id: u64,
        decision: &str,
        comment: Option<&str>,
    ) -> Result<TaskView> {
        let mut body = json!({ "decision": decision });
        if let Some(comment) = comment {
            body["comment"] = json!(comment);
        }
        let response = self
            .http
            .post(self.url(&format!("/api/tasks/{id}/review")))
            .json(&body)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    // ------------------------------------------------------------------
    // Profile and users
    // ------------------------------------------------------------------

    pub async fn me(&self) -> Result<UserProfile> {
        self.get_json("/api/me").await
    }

    pub async fn my_role(&self) -> Result<RoleInfo> {
        self.get_json("/api/me/role").await
    }

    pub async fn save_profile(&self, body: &Value) -> Result<UserProfile> {
        let response = self
            .http
            .put(self.url("/api/me"))
            .json(body)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn user_stats(&self) -> Result<Vec<UserStats>> {
        self.get_json("/api/users").await
    }

    pub async fn active_users(&self) -> Result<Vec<UserSummary>> {
        self.get_json("/api/users/active").await
    }

    pub async fn set_role(&self, principal: &str, role: UserRole) -> Result<UserProfile> {
        let response = self
            .http
            .put(self.url(&format!("/api/users/{principal}/role")))
            .json(&json!({ "role": role }))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn set_status(
        &self,
        principal: &str,
        status: AccountStatus,
    ) -> Result<UserProfile> {
        let response = self
            .http
            .put(self.url(&format!("/api/users/{principal}/status")))
            .json(&json!({ "accountStatus": status }))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn delete_user(&self, principal: &str) -> Result<()> {
        let response = self
            .http
            .delete(self.url(&format!("/api/users/{principal}")))
            .send()
            .await?;
        if response.status() != StatusCode::NO_CONTENT {
            Self::check(response).await?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Reporting
    // ------------------------------------------------------------------

    pub async fn dashboard(&self) -> Result<AdminDashboard> {
        self.get_json("/api/dashboard").await
    }

    pub async fn department_productivity(&self) -> Result<Vec<DepartmentProductivity>> {
        self.get_json("/api/departments/productivity").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_task() -> Value {
        json!({
            "taskId": 7,
            "title": "Inspect scaffolding",
            "description": "Check the scaffolding on site 3",
            "department": "construction",
            "priority": "medium",
            "performancePoints": 20,
            "assignedTo": "emp-1",
            "createdBy": "mgr-1",
            "createdAt": "2025-05-01T08:00:00Z",
            "deadline": "2025-05-03T17:00:00Z",
            "approvalStatus": "pending",
            "status": "yellow",
            "assigneeName": "emp-1"
        })
    }

    #[tokio::test]
    async fn test_my_tasks_sends_identity_header() {
        let mock = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tasks/mine"))
            .and(header("x-auth-principal", "emp-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([sample_task()])))
            .mount(&mock)
            .await;

        let client = ApiClient::new(&mock.uri(), "emp-1").unwrap();
        let tasks = client.my_tasks().await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].task.task_id, 7);
        assert_eq!(tasks[0].assignee_name.as_deref(), Some("emp-1"));
    }

    #[tokio::test]
    async fn test_error_bodies_become_messages() {
        let mock = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tasks"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "error": "forbidden",
                "message": "Forbidden: requires an admin or manager role"
            })))
            .mount(&mock)
            .await;

        let client = ApiClient::new(&mock.uri(), "emp-1").unwrap();
        let err = client.all_tasks().await.unwrap_err();
        assert!(err.to_string().contains("requires an admin or manager role"));
    }

    #[tokio::test]
    async fn test_create_task_returns_id() {
        let mock = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/tasks"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "taskId": 12 })))
            .mount(&mock)
            .await;

        let client = ApiClient::new(&mock.uri(), "mgr-1").unwrap();
        let id = client
            .create_task(&json!({ "title": "t" }))
            .await
            .unwrap();
        assert_eq!(id, 12);
    }

    #[tokio::test]
    async fn test_delete_user_accepts_no_content() {
        let mock = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/users/emp-1"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&mock)
            .await;

        let client = ApiClient::new(&mock.uri(), "admin-1").unwrap();
        client.delete_user("emp-1").await.unwrap();
    }
}
