use crate::{
    domain::{
        item::{Item, ItemId, ProjectId, StatusId},
        status::StatusCatalog,
    },
    error::{BoardError, Result},
};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, sync::Arc};

/// A column of the board: every item whose status is `id`, in display order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardList {
    pub id: StatusId,
    pub name: String,
    #[serde(default)]
    pub alias: String,
    #[serde(default)]
    pub items: Vec<Item>,
}

impl BoardList {
    pub fn new(id: impl Into<StatusId>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            alias: name.to_lowercase().replace(' ', ""),
            name,
            items: Vec::new(),
        }
    }

    pub fn with_items(mut self, items: Vec<Item>) -> Self {
        self.items = items;
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Position of an item within this list
    pub fn position_of(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    pub fn item_ids(&self) -> Vec<ItemId> {
        self.items.iter().map(|item| item.id).collect()
    }
}

/// Snapshot of one project's board
///
/// Lists are shared behind `Arc`, so cloning a board is cheap and a list
/// that a transition did not touch stays pointer-identical to its previous
/// version (see [`Board::shares_list`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BoardRecord")]
pub struct Board {
    project_id: ProjectId,
    lists: Vec<Arc<BoardList>>,
}

/// Serialized form of a board, validated through [`Board::new`]
#[derive(Deserialize)]
struct BoardRecord {
    project_id: ProjectId,
    lists: Vec<BoardList>,
}

impl TryFrom<BoardRecord> for Board {
    type Error = BoardError;

    fn try_from(record: BoardRecord) -> Result<Self> {
        Board::new(record.project_id, record.lists)
    }
}

impl Board {
    /// Builds a board, checking that list ids and item ids are unique
    pub fn new(project_id: ProjectId, lists: Vec<BoardList>) -> Result<Self> {
        let mut list_ids = HashSet::new();
        let mut item_ids = HashSet::new();

        for list in &lists {
            if !list_ids.insert(&list.id) {
                return Err(BoardError::DuplicateList(list.id.to_string()));
            }
            for item in &list.items {
                if !item_ids.insert(item.id) {
                    return Err(BoardError::DuplicateItem(item.id.to_string()));
                }
            }
        }

        Ok(Self {
            project_id,
            lists: lists.into_iter().map(Arc::new).collect(),
        })
    }

    pub(crate) fn from_shared(project_id: ProjectId, lists: Vec<Arc<BoardList>>) -> Self {
        Self { project_id, lists }
    }

    pub fn project_id(&self) -> ProjectId {
        self.project_id
    }

    pub fn lists(&self) -> &[Arc<BoardList>] {
        &self.lists
    }

    /// Gets the list for a status
    pub fn list(&self, id: &StatusId) -> Option<&BoardList> {
        self.lists.iter().find(|l| &l.id == id).map(Arc::as_ref)
    }

    pub(crate) fn list_position(&self, id: &StatusId) -> Option<usize> {
        self.lists.iter().position(|l| &l.id == id)
    }

    /// Finds an item anywhere on the board, with its list and index
    pub fn find_item(&self, id: ItemId) -> Option<(&BoardList, usize, &Item)> {
        self.lists.iter().find_map(|list| {
            list.position_of(id)
                .map(|index| (list.as_ref(), index, &list.items[index]))
        })
    }

    pub fn item_count(&self) -> usize {
        self.lists.iter().map(|l| l.len()).sum()
    }

    /// True when both boards hold the very same allocation for list `id`
    pub fn shares_list(&self, other: &Board, id: &StatusId) -> bool {
        let mine = self.lists.iter().find(|l| &l.id == id);
        let theirs = other.lists.iter().find(|l| &l.id == id);
        matches!((mine, theirs), (Some(a), Some(b)) if Arc::ptr_eq(a, b))
    }

    /// Reorders lists into catalog order
    ///
    /// Catalog statuses missing from the board get an empty list unless they
    /// are marked deleted. Lists the catalog does not know keep their
    /// relative order after the catalog's lists.
    pub fn conform_to(&self, catalog: &StatusCatalog) -> Board {
        if catalog.is_empty() {
            return self.clone();
        }

        let mut lists = Vec::with_capacity(self.lists.len().max(catalog.statuses().len()));
        for status in catalog.statuses() {
            match self.lists.iter().find(|l| l.id == status.id) {
                Some(list) if status.deleted && list.is_empty() => {}
                Some(list) => lists.push(Arc::clone(list)),
                None if status.deleted => {}
                None => lists.push(Arc::new(BoardList {
                    id: status.id.clone(),
                    name: status.name.clone(),
                    alias: status.alias.clone(),
                    items: Vec::new(),
                })),
            }
        }
        lists.extend(
            self.lists
                .iter()
                .filter(|l| catalog.position(&l.id).is_none())
                .cloned(),
        );

        Board::from_shared(self.project_id, lists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::status::Status;

    fn item(id: u64, list: &str) -> Item {
        Item::new(ItemId::new(id), format!("Task {}", id), StatusId::from(list))
    }

    fn sample_board() -> Board {
        Board::new(
            ProjectId::new(7),
            vec![
                BoardList::new("1", "BACKLOG").with_items(vec![item(1, "1"), item(2, "1")]),
                BoardList::new("3", "IN PROGRESS").with_items(vec![item(3, "3")]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_board_creation() {
        let board = sample_board();
        assert_eq!(board.project_id(), ProjectId::new(7));
        assert_eq!(board.lists().len(), 2);
        assert_eq!(board.item_count(), 3);
    }

    #[test]
    fn test_duplicate_list_rejected() {
        let result = Board::new(
            ProjectId::new(1),
            vec![BoardList::new("1", "A"), BoardList::new("1", "B")],
        );
        assert!(matches!(result, Err(BoardError::DuplicateList(id)) if id == "1"));
    }

    #[test]
    fn test_duplicate_item_across_lists_rejected() {
        let result = Board::new(
            ProjectId::new(1),
            vec![
                BoardList::new("1", "A").with_items(vec![item(5, "1")]),
                BoardList::new("2", "B").with_items(vec![item(5, "2")]),
            ],
        );
        assert!(matches!(result, Err(BoardError::DuplicateItem(id)) if id == "5"));
    }

    #[test]
    fn test_find_item() {
        let board = sample_board();

        let (list, index, found) = board.find_item(ItemId::new(2)).unwrap();
        assert_eq!(list.id, StatusId::from("1"));
        assert_eq!(index, 1);
        assert_eq!(found.display_name, "Task 2");

        assert!(board.find_item(ItemId::new(99)).is_none());
    }

    #[test]
    fn test_clone_shares_lists() {
        let board = sample_board();
        let copy = board.clone();
        assert!(board.shares_list(&copy, &StatusId::from("1")));
        assert!(!board.shares_list(&copy, &StatusId::from("missing")));
    }

    #[test]
    fn test_conform_to_catalog_order() {
        let board = Board::new(
            ProjectId::new(1),
            vec![
                BoardList::new("4", "DONE"),
                BoardList::new("x", "CUSTOM"),
                BoardList::new("1", "BACKLOG").with_items(vec![item(1, "1")]),
            ],
        )
        .unwrap();
        let catalog = StatusCatalog::new(vec![
            Status::new("1", "BACKLOG"),
            Status::new("2", "SELECTED FOR DEVELOPMENT"),
            Status::new("4", "DONE"),
        ]);

        let conformed = board.conform_to(&catalog);
        let ids: Vec<&str> = conformed.lists().iter().map(|l| l.id.as_str()).collect();

        assert_eq!(ids, vec!["1", "2", "4", "x"]);
        assert!(conformed.list(&StatusId::from("2")).unwrap().is_empty());
        assert!(board.shares_list(&conformed, &StatusId::from("1")));
    }

    #[test]
    fn test_conform_skips_empty_deleted_status() {
        let board = Board::new(ProjectId::new(1), vec![BoardList::new("1", "BACKLOG")]).unwrap();
        let mut retired = Status::new("9", "RETIRED");
        retired.deleted = true;
        let catalog = StatusCatalog::new(vec![Status::new("1", "BACKLOG"), retired]);

        let conformed = board.conform_to(&catalog);
        assert_eq!(conformed.lists().len(), 1);
    }

    #[test]
    fn test_board_serialization() {
        let board = sample_board();
        let json = serde_json::to_string(&board).unwrap();
        let restored: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, board);
    }

    #[test]
    fn test_deserialize_rejects_duplicate_item() {
        let json = r#"{
            "project_id": 1,
            "lists": [
                { "id": "1", "name": "A", "items": [ { "id": 5, "display_name": "x", "list_id": "1" } ] },
                { "id": "2", "name": "B", "items": [ { "id": 5, "display_name": "x", "list_id": "2" } ] }
            ]
        }"#;

        let err = serde_json::from_str::<Board>(json).unwrap_err();
        assert!(err.to_string().contains("Duplicate item id on board: 5"));
    }
}
