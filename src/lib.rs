//! # Boardsync Core
//!
//! Optimistic drag-and-drop reordering for kanban boards backed by a remote
//! task-management service.
//!
//! A [`BoardEngine`] keeps a local snapshot of one project's board. Moving a
//! card between status columns updates the snapshot immediately; the new
//! status is then sent to the [`TaskService`] and the snapshot is replaced
//! by a fresh fetch, whether the update succeeded or not.

pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod notify;
pub mod service;

// Re-export commonly used types
pub use config::ServiceConfig;
pub use domain::{
    apply_move, Board, BoardList, Item, ItemId, Location, MoveIntent, MoveKind, MoveOutcome,
    ProjectId, Status, StatusCatalog, StatusId,
};
pub use engine::{BoardEngine, GesturePhase, MoveId, PendingMove};
pub use error::{BoardError, Result};
pub use notify::{Notification, NotificationKind, NotificationLog, Notifier, TracingNotifier};
#[cfg(feature = "http-client")]
pub use service::http::HttpTaskService;
pub use service::{memory::InMemoryTaskService, TaskService};
