use crate::{
    domain::{Board, BoardList, ItemId, ProjectId, StatusCatalog, StatusId},
    error::{BoardError, Result},
    service::TaskService,
};
use async_trait::async_trait;
use std::{
    collections::{HashMap, VecDeque},
    sync::{Mutex, MutexGuard, PoisonError},
};

#[derive(Debug, Default)]
struct Inner {
    boards: HashMap<ProjectId, Board>,
    catalog: StatusCatalog,
    fetch_failures: VecDeque<BoardError>,
    status_failures: VecDeque<BoardError>,
    update_failures: VecDeque<BoardError>,
    updates: Vec<(ItemId, StatusId)>,
    fetches: usize,
}

/// In-process task service holding the authoritative boards
///
/// A status update moves the item to the end of its new list, which is how
/// the remote service orders a column it has just been given an item for.
/// Failures can be queued to exercise the engine's reconciliation path.
#[derive(Debug, Default)]
pub struct InMemoryTaskService {
    inner: Mutex<Inner>,
}

impl InMemoryTaskService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a service already holding one board
    pub fn with_board(board: Board) -> Self {
        let service = Self::new();
        service.set_board(board);
        service
    }

    pub fn with_catalog(self, catalog: StatusCatalog) -> Self {
        self.lock().catalog = catalog;
        self
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces the authoritative board of its project
    pub fn set_board(&self, board: Board) {
        self.lock().boards.insert(board.project_id(), board);
    }

    /// Current authoritative board of a project
    pub fn board(&self, project_id: &ProjectId) -> Option<Board> {
        self.lock().boards.get(project_id).cloned()
    }

    /// The next `fetch_board` call fails with `error`
    pub fn fail_next_fetch(&self, error: BoardError) {
        self.lock().fetch_failures.push_back(error);
    }

    /// The next `fetch_statuses` call fails with `error`
    pub fn fail_next_statuses(&self, error: BoardError) {
        self.lock().status_failures.push_back(error);
    }

    /// The next `update_item_classification` call fails with `error`
    pub fn fail_next_update(&self, error: BoardError) {
        self.lock().update_failures.push_back(error);
    }

    /// Every status update received, in arrival order, including failed ones
    pub fn classification_updates(&self) -> Vec<(ItemId, StatusId)> {
        self.lock().updates.clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.lock().fetches
    }
}

#[async_trait]
impl TaskService for InMemoryTaskService {
    async fn fetch_board(&self, project_id: &ProjectId) -> Result<Board> {
        let mut inner = self.lock();
        inner.fetches += 1;

        if let Some(err) = inner.fetch_failures.pop_front() {
            return Err(err);
        }

        inner
            .boards
            .get(project_id)
            .cloned()
            .ok_or_else(|| BoardError::NotFound(format!("project {}", project_id)))
    }

    async fn update_item_classification(
        &self,
        item_id: &ItemId,
        status_id: &StatusId,
    ) -> Result<()> {
        let mut inner = self.lock();
        inner.updates.push((*item_id, status_id.clone()));

        if let Some(err) = inner.update_failures.pop_front() {
            return Err(err);
        }

        let (project_id, board) = inner
            .boards
            .iter()
            .find(|(_, board)| board.find_item(*item_id).is_some())
            .map(|(id, board)| (*id, board))
            .ok_or_else(|| BoardError::ItemNotFound(item_id.to_string()))?;

        if board.list(status_id).is_none() {
            return Err(BoardError::NotFound(format!("status {}", status_id)));
        }

        let mut lists: Vec<BoardList> = board
            .lists()
            .iter()
            .map(|l| l.as_ref().clone())
            .collect();
        let mut item = lists
            .iter_mut()
            .find_map(|list| list.position_of(*item_id).map(|pos| list.items.remove(pos)))
            .ok_or_else(|| BoardError::ItemNotFound(item_id.to_string()))?;
        item.list_id = status_id.clone();
        if let Some(dest) = lists.iter_mut().find(|l| &l.id == status_id) {
            dest.items.push(item);
        }

        let updated = Board::new(project_id, lists)?;
        inner.boards.insert(project_id, updated);
        Ok(())
    }

    async fn fetch_statuses(&self) -> Result<StatusCatalog> {
        let mut inner = self.lock();
        if let Some(err) = inner.status_failures.pop_front() {
            return Err(err);
        }
        Ok(inner.catalog.clone())
    }
}
