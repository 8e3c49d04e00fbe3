pub mod board;
pub mod item;
pub mod moves;
pub mod status;

pub use board::{Board, BoardList};
pub use item::{Assignee, Item, ItemId, Priority, ProjectId, StatusId, TaskType};
pub use moves::{apply_move, Location, MoveIntent, MoveKind, MoveOutcome};
pub use status::{Status, StatusCatalog};
