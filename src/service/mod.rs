use crate::{
    domain::{Board, ItemId, ProjectId, StatusCatalog, StatusId},
    error::Result,
};
use async_trait::async_trait;
use std::sync::Arc;

pub mod memory;

#[cfg(feature = "http-client")]
pub mod http;
#[cfg(feature = "http-client")]
mod wire;

/// The authoritative task-management service behind a board
#[async_trait]
pub trait TaskService: Send + Sync {
    /// Fetches the full list/item partition of a project
    async fn fetch_board(&self, project_id: &ProjectId) -> Result<Board>;

    /// Persists a new status for a single item
    async fn update_item_classification(&self, item_id: &ItemId, status_id: &StatusId)
        -> Result<()>;

    /// Fetches the status catalog that defines column order
    async fn fetch_statuses(&self) -> Result<StatusCatalog>;
}

#[async_trait]
impl<T: TaskService + ?Sized> TaskService for Arc<T> {
    async fn fetch_board(&self, project_id: &ProjectId) -> Result<Board> {
        (**self).fetch_board(project_id).await
    }

    async fn update_item_classification(
        &self,
        item_id: &ItemId,
        status_id: &StatusId,
    ) -> Result<()> {
        (**self).update_item_classification(item_id, status_id).await
    }

    async fn fetch_statuses(&self) -> Result<StatusCatalog> {
        (**self).fetch_statuses().await
    }
}
