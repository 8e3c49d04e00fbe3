use crate::domain::item::StatusId;
use serde::{Deserialize, Serialize};

/// A status known to the remote service; each status is one board column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub id: StatusId,
    pub name: String,
    pub alias: String,
    #[serde(default)]
    pub deleted: bool,
}

impl Status {
    pub fn new(id: impl Into<StatusId>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            alias: name.to_lowercase().replace(' ', ""),
            name,
            deleted: false,
        }
    }
}

/// Ordered status catalog; its order is the column order of every board
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusCatalog {
    statuses: Vec<Status>,
}

impl StatusCatalog {
    pub fn new(statuses: Vec<Status>) -> Self {
        Self { statuses }
    }

    pub fn statuses(&self) -> &[Status] {
        &self.statuses
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    pub fn get(&self, id: &StatusId) -> Option<&Status> {
        self.statuses.iter().find(|s| &s.id == id)
    }

    /// Position of a status in column order
    pub fn position(&self, id: &StatusId) -> Option<usize> {
        self.statuses.iter().position(|s| &s.id == id)
    }
}
