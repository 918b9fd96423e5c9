use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::{ApiError, ErrorBody};
use crate::task::{NewTask, StatusUpdate, Task, TaskId};

/// HTTP client for the remote task API.
///
/// One instance is shared by every request handler; `reqwest::Client` pools
/// connections internally so cloning is cheap.
#[derive(Debug, Clone)]
pub struct TaskClient {
    base_url: Url,
    client: Client,
}

impl TaskClient {
    /// Create a client for the API rooted at `base_url`
    /// (e.g. `http://localhost:4000` or `http://host/api/`).
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(concat!("taskboard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::Transport)?;
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{base_url:?}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(format!(
                "{base_url} cannot carry a path"
            )));
        }
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `GET /tasks`
    pub async fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        let url = self.tasks_url(None)?;
        let response = self.send(self.client.request(Method::GET, url)).await?;
        decode(response).await
    }

    /// `GET /tasks/{id}`
    pub async fn get_task(&self, id: &TaskId) -> Result<Task, ApiError> {
        let url = self.tasks_url(Some(id))?;
        let response = self.send(self.client.request(Method::GET, url)).await?;
        decode(response).await
    }

    /// `POST /tasks`. The created task is not needed by callers.
    pub async fn create_task(&self, task: &NewTask) -> Result<(), ApiError> {
        let url = self.tasks_url(None)?;
        let request = self.client.request(Method::POST, url).json(task);
        self.send(request).await?;
        Ok(())
    }

    /// `PATCH /tasks/{id}` with `{ "status": ... }`.
    pub async fn update_status(&self, id: &TaskId, status: &str) -> Result<(), ApiError> {
        let url = self.tasks_url(Some(id))?;
        let body = StatusUpdate { status: status.to_owned() };
        let request = self.client.request(Method::PATCH, url).json(&body);
        self.send(request).await?;
        Ok(())
    }

    /// `DELETE /tasks/{id}`
    pub async fn delete_task(&self, id: &TaskId) -> Result<(), ApiError> {
        let url = self.tasks_url(Some(id))?;
        self.send(self.client.request(Method::DELETE, url)).await?;
        Ok(())
    }

    /// `{base}/tasks` or `{base}/tasks/{id}`, with the id percent-encoded as
    /// a single path segment.
    ///
    /// `url` drops `.` and `..` segments instead of escaping them, which would
    /// turn a request for one task into one for the collection.
    fn tasks_url(&self, id: Option<&TaskId>) -> Result<Url, ApiError> {
        let id = id.map(ToString::to_string);
        if let Some(bad) = id.as_deref().filter(|id| matches!(*id, "" | "." | "..")) {
            return Err(ApiError::InvalidId(bad.to_owned()));
        }

        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?;
            segments.pop_if_empty().push("tasks");
            if let Some(id) = id.as_deref() {
                segments.push(id);
            }
        }
        Ok(url)
    }

    /// Send a request and turn non-2xx answers into [`ApiError::Status`].
    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let request = request.build().map_err(ApiError::Transport)?;
        debug!(method = %request.method(), url = %request.url(), "task API request");

        let response = self
            .client
            .execute(request)
            .await
            .map_err(ApiError::Transport)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // A body that cannot be read is reported the same way as an empty one.
        let text = response.text().await.unwrap_or_default();
        debug!(status = status.as_u16(), body = %text, "task API error response");
        Err(ApiError::Status {
            status,
            body: ErrorBody::from_text(&text),
        })
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    response.json::<T>().await.map_err(ApiError::Decode)
}
