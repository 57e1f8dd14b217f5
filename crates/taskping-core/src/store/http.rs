//! HTTP implementation of the task store.
//!
//! Endpoints:
//! - `GET    /api/tasks?filter={all|pending|completed}` -> `{tasks, count}`
//! - `POST   /api/tasks`
//! - `PATCH  /api/tasks/{id}`
//! - `DELETE /api/tasks/{id}`
//!
//! Non-success responses carry a JSON body with an `error` or `detail`
//! message, which is surfaced in [`StoreError::Api`].

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use url::Url;
use uuid::Uuid;

use super::{TaskFilter, TaskStore};
use crate::error::StoreError;
use crate::task::{Task, TaskDraft, TaskPatch};

pub struct HttpTaskStore {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

#[derive(Deserialize)]
struct TaskListResponse {
    tasks: Vec<Task>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: Option<String>,
    detail: Option<String>,
}

impl HttpTaskStore {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, StoreError> {
        let base_url = Url::parse(base_url)
            .map_err(|err| StoreError::InvalidBaseUrl(format!("{base_url}: {err}")))?;
        Ok(Self {
            client: Client::new(),
            base_url,
            token,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, StoreError> {
        self.base_url
            .join(path)
            .map_err(|err| StoreError::InvalidBaseUrl(err.to_string()))
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn expect_success(response: Response) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        Err(Self::api_error(status, response).await)
    }

    async fn expect_task(response: Response, id: Uuid) -> Result<Task, StoreError> {
        if response.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(id));
        }
        Ok(Self::expect_success(response).await?.json().await?)
    }

    async fn api_error(status: StatusCode, response: Response) -> StoreError {
        let message = response
            .json::<ApiErrorBody>()
            .await
            .ok()
            .and_then(|body| body.error.or(body.detail))
            .unwrap_or_else(|| format!("request failed with status {status}"));
        StoreError::Api {
            status: status.as_u16(),
            message,
        }
    }
}

#[async_trait]
impl TaskStore for HttpTaskStore {
    async fn list_tasks(&self, filter: TaskFilter) -> Result<Vec<Task>, StoreError> {
        let mut url = self.endpoint("/api/tasks")?;
        url.query_pairs_mut().append_pair("filter", filter.as_query());
        let response = self.authed(self.client.get(url)).send().await?;
        let body: TaskListResponse = Self::expect_success(response).await?.json().await?;
        Ok(body.tasks)
    }

    async fn create_task(&self, draft: &TaskDraft) -> Result<Task, StoreError> {
        let url = self.endpoint("/api/tasks")?;
        let response = self.authed(self.client.post(url)).json(draft).send().await?;
        Ok(Self::expect_success(response).await?.json().await?)
    }

    async fn update_task(&self, id: Uuid, patch: &TaskPatch) -> Result<Task, StoreError> {
        let url = self.endpoint(&format!("/api/tasks/{id}"))?;
        let response = self.authed(self.client.patch(url)).json(patch).send().await?;
        Self::expect_task(response, id).await
    }

    async fn toggle_completed(&self, id: Uuid, completed: bool) -> Result<Task, StoreError> {
        let url = self.endpoint(&format!("/api/tasks/{id}"))?;
        let response = self
            .authed(self.client.patch(url))
            .json(&json!({ "completed": completed }))
            .send()
            .await?;
        Self::expect_task(response, id).await
    }

    async fn delete_task(&self, id: Uuid) -> Result<(), StoreError> {
        let url = self.endpoint(&format!("/api/tasks/{id}"))?;
        let response = self.authed(self.client.delete(url)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(id));
        }
        Self::expect_success(response).await?;
        Ok(())
    }
}
