//! Optimistic board state with remote reconciliation.
//!
//! [`BoardEngine::apply_move`] changes the local snapshot at once;
//! [`BoardEngine::commit_move`] asks the service to persist the new status
//! and then always replaces the snapshot with a fresh fetch, whether the
//! commit succeeded or not. There is no rollback and no retry.

use crate::{
    domain::{self, Board, ItemId, MoveIntent, ProjectId, StatusCatalog, StatusId},
    error::{BoardError, Result},
    notify::{Notification, Notifier, TracingNotifier},
    service::TaskService,
};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Identifies one drag gesture from drop to reconciliation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveId(Uuid);

impl MoveId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for MoveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a gesture is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GesturePhase {
    Idle,
    /// Applied locally, commit not started
    Moved,
    /// Commit or the follow-up fetch in flight
    Reconciling,
}

/// A cross-list move applied locally and waiting to be committed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMove {
    pub id: MoveId,
    pub item_id: ItemId,
    pub from: StatusId,
    pub to: StatusId,
}

#[derive(Debug, Default)]
struct EngineState {
    board: Option<Board>,
    catalog: StatusCatalog,
    gestures: HashMap<MoveId, GesturePhase>,
}

/// Owns the local board snapshot of one project
pub struct BoardEngine<S> {
    service: S,
    project_id: ProjectId,
    notifier: Arc<dyn Notifier>,
    state: RwLock<EngineState>,
}

impl<S: TaskService> BoardEngine<S> {
    pub fn new(service: S, project_id: ProjectId) -> Self {
        Self {
            service,
            project_id,
            notifier: Arc::new(TracingNotifier),
            state: RwLock::new(EngineState::default()),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn project_id(&self) -> ProjectId {
        self.project_id
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    fn read(&self) -> RwLockReadGuard<'_, EngineState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, EngineState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current snapshot; `None` until the first successful fetch
    pub fn board(&self) -> Option<Board> {
        self.read().board.clone()
    }

    pub fn phase(&self, id: MoveId) -> GesturePhase {
        self.read()
            .gestures
            .get(&id)
            .copied()
            .unwrap_or(GesturePhase::Idle)
    }

    /// Number of gestures not yet back to idle
    pub fn pending_moves(&self) -> usize {
        self.read().gestures.len()
    }

    /// Fetches the status catalog, then the board
    ///
    /// A catalog failure is only logged; the board then keeps the order the
    /// service sent.
    pub async fn load(&self) -> Result<Board> {
        match self.service.fetch_statuses().await {
            Ok(catalog) => {
                self.write().catalog = catalog;
            }
            Err(e) => warn!(
                project = %self.project_id,
                error = %e,
                "Status catalog unavailable"
            ),
        }
        self.refresh().await
    }

    /// Replaces the snapshot with the service's board
    ///
    /// On failure the user is notified and the previous snapshot is kept.
    pub async fn refresh(&self) -> Result<Board> {
        match self.service.fetch_board(&self.project_id).await {
            Ok(fetched) => {
                let mut state = self.write();
                let board = fetched.conform_to(&state.catalog);
                state.board = Some(board.clone());
                info!(
                    project = %self.project_id,
                    items = board.item_count(),
                    "Board reconciled"
                );
                Ok(board)
            }
            Err(e) => {
                warn!(project = %self.project_id, error = %e, "Board fetch failed");
                self.notifier
                    .notify(Notification::error(e.user_message()).with_detail(e.to_string()));
                Err(e)
            }
        }
    }

    /// Applies a gesture to the local snapshot without suspending
    ///
    /// Returns the move to commit for a cross-list move and `None` for every
    /// gesture that leaves the board as it was. Each returned move stays
    /// pending until it is passed to [`Self::commit_move`] or
    /// [`Self::discard_move`].
    pub fn apply_move(&self, intent: &MoveIntent) -> Result<Option<PendingMove>> {
        let mut state = self.write();
        let board = state.board.as_ref().ok_or(BoardError::BoardNotLoaded)?;
        let outcome = domain::apply_move(board, intent)?;

        let (true, Some(destination)) = (outcome.kind.changes_board(), &intent.destination) else {
            debug!(item = %intent.item_id, kind = ?outcome.kind, "Move ignored");
            return Ok(None);
        };

        let pending = PendingMove {
            id: MoveId::new(),
            item_id: intent.item_id,
            from: intent.source.list_id.clone(),
            to: destination.list_id.clone(),
        };

        state.board = Some(outcome.board);
        state.gestures.insert(pending.id, GesturePhase::Moved);
        debug!(
            gesture = %pending.id,
            item = %pending.item_id,
            from = %pending.from,
            to = %pending.to,
            "Move applied"
        );
        Ok(Some(pending))
    }

    /// Persists a move remotely, then reconciles with a fresh fetch
    ///
    /// A failed commit is reported to the user once; the returned error is
    /// for inspection only, the snapshot has already been reconciled.
    pub async fn commit_move(&self, pending: PendingMove) -> Result<()> {
        self.set_phase(pending.id, GesturePhase::Reconciling);

        let result = self
            .service
            .update_item_classification(&pending.item_id, &pending.to)
            .await;

        match &result {
            Ok(()) => info!(
                gesture = %pending.id,
                item = %pending.item_id,
                to = %pending.to,
                "Move committed"
            ),
            Err(e) => {
                warn!(
                    gesture = %pending.id,
                    item = %pending.item_id,
                    error = %e,
                    "Move commit failed"
                );
                self.notifier
                    .notify(Notification::error(e.user_message()).with_detail(e.to_string()));
            }
        }

        // A failed fetch has already been reported and keeps the snapshot
        let _ = self.refresh().await;

        self.write().gestures.remove(&pending.id);
        result
    }

    /// Drops a move that will never be committed and reconciles the snapshot
    ///
    /// Nothing is sent to the service; the local optimistic change is
    /// replaced by a fresh fetch.
    pub async fn discard_move(&self, pending: PendingMove) -> Result<Board> {
        if self.write().gestures.remove(&pending.id).is_some() {
            debug!(gesture = %pending.id, item = %pending.item_id, "Move discarded");
        }
        self.refresh().await
    }

    fn set_phase(&self, id: MoveId, phase: GesturePhase) {
        self.write().gestures.insert(id, phase);
    }
}

impl<S: TaskService + 'static> BoardEngine<S> {
    /// Drag-end handler: applies the gesture and commits it in the background
    ///
    /// Must be called from within a tokio runtime. The handle may be dropped;
    /// the commit still runs to completion.
    pub fn move_item(
        self: &Arc<Self>,
        intent: &MoveIntent,
    ) -> Result<Option<JoinHandle<Result<()>>>> {
        let Some(pending) = self.apply_move(intent)? else {
            return Ok(None);
        };

        let engine = Arc::clone(self);
        Ok(Some(tokio::spawn(async move { engine.commit_move(pending).await })))
    }
}

impl<S> fmt::Debug for BoardEngine<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoardEngine")
            .field("project_id", &self.project_id)
            .finish_non_exhaustive()
    }
}
