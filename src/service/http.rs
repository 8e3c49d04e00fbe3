//! REST client for the project-management API.

use crate::{
    config::ServiceConfig,
    domain::{Board, ItemId, ProjectId, StatusCatalog, StatusId},
    error::{BoardError, Result},
    service::{
        wire::{self, Envelope, ProjectDetail, StatusEntry, UpdateStatusRequest},
        TaskService,
    },
};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

const PROJECT_DETAIL_PATH: &str = "/Project/getProjectDetail";
const UPDATE_STATUS_PATH: &str = "/Project/updateStatus";
const STATUS_CATALOG_PATH: &str = "/Status/getAll";
const API_TOKEN_HEADER: &str = "TokenCybersoft";

/// Pull a human-readable message out of an error body.
///
/// The API puts its explanation in `content` when that is a string, otherwise
/// in `message`; anything unparseable is returned as-is.
fn extract_error_message(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(content) = json.get("content").and_then(|v| v.as_str()) {
            return content.to_string();
        }
        if let Some(message) = json.get("message").and_then(|v| v.as_str()) {
            return message.to_string();
        }
    }
    body.to_string()
}

/// Task service backed by the remote REST API
#[derive(Debug, Clone)]
pub struct HttpTaskService {
    client: Client,
    base_url: String,
    access_token: Option<String>,
    api_token: Option<String>,
}

impl HttpTaskService {
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let config = config.clone().normalized()?;
        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            client,
            base_url: config.base_url,
            access_token: config.access_token,
            api_token: config.api_token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        if let Some(token) = &self.access_token {
            builder = builder.bearer_auth(token);
        }
        if let Some(token) = &self.api_token {
            builder = builder.header(API_TOKEN_HEADER, token);
        }
        builder
    }

    /// Map an HTTP response to a `BoardError` based on status code.
    async fn check_response(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = extract_error_message(&body);

        match status.as_u16() {
            401 => Err(BoardError::Unauthorized(message)),
            403 => Err(BoardError::Forbidden(message)),
            404 => Err(BoardError::NotFound(message)),
            code => Err(BoardError::Api {
                status: code,
                message,
            }),
        }
    }

    async fn content<T: DeserializeOwned>(response: Response) -> Result<T> {
        let response = Self::check_response(response).await?;
        let bytes = response.bytes().await?;
        let envelope: Envelope<T> = serde_json::from_slice(&bytes)?;
        if let Some(message) = &envelope.message {
            debug!(message = %message, "API response");
        }
        Ok(envelope.content)
    }
}

#[async_trait]
impl TaskService for HttpTaskService {
    #[instrument(skip_all, fields(project = %project_id))]
    async fn fetch_board(&self, project_id: &ProjectId) -> Result<Board> {
        let response = self
            .request(Method::GET, PROJECT_DETAIL_PATH)
            .query(&[("id", project_id.value())])
            .send()
            .await?;
        let detail: ProjectDetail = Self::content(response).await?;
        detail.into_board()
    }

    #[instrument(skip_all, fields(item = %item_id, status = %status_id))]
    async fn update_item_classification(
        &self,
        item_id: &ItemId,
        status_id: &StatusId,
    ) -> Result<()> {
        let body = UpdateStatusRequest {
            task_id: item_id.value(),
            status_id: status_id.as_str(),
        };
        let response = self
            .request(Method::PUT, UPDATE_STATUS_PATH)
            .json(&body)
            .send()
            .await?;
        Self::check_response(response).await?;
        Ok(())
    }

    #[instrument(skip_all)]
    async fn fetch_statuses(&self) -> Result<StatusCatalog> {
        let response = self.request(Method::GET, STATUS_CATALOG_PATH).send().await?;
        let entries: Vec<StatusEntry> = Self::content(response).await?;
        Ok(wire::into_catalog(entries))
    }
}
