//! HTTP client for the taskboard REST API.

use anyhow::{anyhow, Context, Result};
use reqwest::{Method, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use taskboard_core::{Device, Task};
use tracing::debug;

/// Body for task creation; omitted fields take server defaults.
#[derive(Debug, Serialize)]
pub struct TaskDraft {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub completed: bool,
}

/// Only the fields set here are sent, so the server leaves the rest alone.
#[derive(Debug, Default, Serialize)]
pub struct TaskChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct DeviceDraft {
    pub name: String,
    pub model: String,
    pub storage: String,
}

#[derive(Debug, Default, Serialize)]
pub struct DeviceChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Health {
    pub status: String,
    pub message: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

pub struct ApiClient {
    base_url: Url,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("invalid server URL: {}", base_url))?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("invalid server URL: {}", base_url));
        }

        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
        })
    }

    /// Appends `segments` to the base URL, percent-encoding each one so ids
    /// containing `/`, `?` or `#` stay inside their path segment.
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("invalid server URL: {}", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send<B: Serialize>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<Response> {
        let url = self.url(segments)?;
        debug!("{} {}", method, url);
        let mut request = self.http.request(method.clone(), url.clone());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("{} {} failed", method, url))?;
        check_status(response).await
    }

    async fn json<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<T> {
        let response = self.send(method, segments, body).await?;
        response
            .json::<T>()
            .await
            .context("failed to decode response body")
    }

    pub async fn health(&self) -> Result<Health> {
        self.json(Method::GET, &["health"], None::<&()>).await
    }

    pub async fn list_tasks(&self) -> Result<Vec<Task>> {
        self.json(Method::GET, &["api", "tasks"], None::<&()>).await
    }

    pub async fn get_task(&self, id: &str) -> Result<Task> {
        self.json(Method::GET, &["api", "tasks", id], None::<&()>)
            .await
    }

    pub async fn create_task(&self, draft: &TaskDraft) -> Result<Task> {
        self.json(Method::POST, &["api", "tasks"], Some(draft)).await
    }

    pub async fn update_task(&self, id: &str, changes: &TaskChanges) -> Result<Task> {
        self.json(Method::PUT, &["api", "tasks", id], Some(changes))
            .await
    }

    pub async fn delete_task(&self, id: &str) -> Result<()> {
        self.send(Method::DELETE, &["api", "tasks", id], None::<&()>)
            .await?;
        Ok(())
    }

    pub async fn list_devices(&self) -> Result<Vec<Device>> {
        self.json(Method::GET, &["api", "devices"], None::<&()>).await
    }

    pub async fn get_device(&self, id: &str) -> Result<Device> {
        self.json(Method::GET, &["api", "devices", id], None::<&()>)
            .await
    }

    pub async fn create_device(&self, draft: &DeviceDraft) -> Result<Device> {
        self.json(Method::POST, &["api", "devices"], Some(draft)).await
    }

    pub async fn update_device(&self, id: &str, changes: &DeviceChanges) -> Result<Device> {
        self.json(Method::PUT, &["api", "devices", id], Some(changes))
            .await
    }

    pub async fn delete_device(&self, id: &str) -> Result<()> {
        self.send(Method::DELETE, &["api", "devices", id], None::<&()>)
            .await?;
        Ok(())
    }
}

/// Turns non-2xx responses into errors carrying the server's message.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    Err(anyhow!("{}", error_message(status, &text)))
}

fn error_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(err) => format!("{} ({})", err.message, status),
        Err(_) if body.is_empty() => format!("request failed ({})", status),
        Err(_) => format!("{} ({})", body, status),
    }
}
