//! Pure board transitions for drag-and-drop gestures.

use crate::{
    domain::{
        board::{Board, BoardList},
        item::{ItemId, StatusId},
    },
    error::{BoardError, Result},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A position on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub list_id: StatusId,
    pub index: usize,
}

impl Location {
    pub fn new(list_id: impl Into<StatusId>, index: usize) -> Self {
        Self {
            list_id: list_id.into(),
            index,
        }
    }
}

/// One completed drag gesture
///
/// `destination` is `None` when the card was released outside every list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveIntent {
    pub item_id: ItemId,
    pub source: Location,
    pub destination: Option<Location>,
}

impl MoveIntent {
    pub fn new(item_id: ItemId, source: Location, destination: Location) -> Self {
        Self {
            item_id,
            source,
            destination: Some(destination),
        }
    }

    /// A gesture dropped outside any list
    pub fn cancelled(item_id: ItemId, source: Location) -> Self {
        Self {
            item_id,
            source,
            destination: None,
        }
    }
}

/// What a gesture did to the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveKind {
    /// Released outside any list
    Cancelled,
    /// Dropped back where it started
    Unchanged,
    /// Same list, different index; reordering inside a list is not supported
    WithinList,
    /// Moved to another list; the only kind that needs a remote commit
    CrossList,
}

impl MoveKind {
    pub fn changes_board(&self) -> bool {
        matches!(self, Self::CrossList)
    }
}

#[derive(Debug, Clone)]
pub struct MoveOutcome {
    pub board: Board,
    pub kind: MoveKind,
}

/// Applies a gesture to a board snapshot
///
/// Only cross-list moves change anything. The returned board replaces the
/// source and destination lists and shares every other list with `board`.
/// A cross-list intent that does not match the board is rejected and
/// nothing changes; gestures that stay in one list are never validated.
pub fn apply_move(board: &Board, intent: &MoveIntent) -> Result<MoveOutcome> {
    let unchanged = |kind: MoveKind| -> Result<MoveOutcome> {
        Ok(MoveOutcome {
            board: board.clone(),
            kind,
        })
    };

    let Some(destination) = &intent.destination else {
        return unchanged(MoveKind::Cancelled);
    };
    if intent.source.list_id == destination.list_id {
        if intent.source.index == destination.index {
            return unchanged(MoveKind::Unchanged);
        }
        return unchanged(MoveKind::WithinList);
    }

    let source_pos = board
        .list_position(&intent.source.list_id)
        .ok_or_else(|| BoardError::ListNotFound(intent.source.list_id.to_string()))?;
    let dest_pos = board
        .list_position(&destination.list_id)
        .ok_or_else(|| BoardError::ListNotFound(destination.list_id.to_string()))?;

    let source_list = &board.lists()[source_pos];
    let moved = source_list
        .items
        .get(intent.source.index)
        .ok_or_else(|| BoardError::IndexOutOfRange {
            list: source_list.id.to_string(),
            index: intent.source.index,
            len: source_list.len(),
        })?;
    if moved.id != intent.item_id {
        return Err(BoardError::ItemMismatch {
            expected: intent.item_id.to_string(),
            found: moved.id.to_string(),
        });
    }

    let mut source: BoardList = source_list.as_ref().clone();
    let mut item = source.items.remove(intent.source.index);
    item.list_id = destination.list_id.clone();

    let mut dest: BoardList = board.lists()[dest_pos].as_ref().clone();
    let at = destination.index.min(dest.items.len());
    dest.items.insert(at, item);

    let mut lists = board.lists().to_vec();
    lists[source_pos] = Arc::new(source);
    lists[dest_pos] = Arc::new(dest);

    Ok(MoveOutcome {
        board: Board::from_shared(board.project_id(), lists),
        kind: MoveKind::CrossList,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::item::{Item, ProjectId};

    fn item(id: u64, list: &str) -> Item {
        Item::new(ItemId::new(id), format!("Task {}", id), StatusId::from(list))
    }

    /// A = [t1, t2], B = [t3], C = [t4]
    fn board() -> Board {
        Board::new(
            ProjectId::new(1),
            vec![
                BoardList::new("A", "BACKLOG").with_items(vec![item(1, "A"), item(2, "A")]),
                BoardList::new("B", "IN PROGRESS").with_items(vec![item(3, "B")]),
                BoardList::new("C", "DONE").with_items(vec![item(4, "C")]),
            ],
        )
        .unwrap()
    }

    fn ids(board: &Board, list: &str) -> Vec<u64> {
        board
            .list(&StatusId::from(list))
            .unwrap()
            .items
            .iter()
            .map(|i| i.id.value())
            .collect()
    }

    fn all_lists_shared(a: &Board, b: &Board) -> bool {
        a.lists()
            .iter()
            .all(|l| a.shares_list(b, &l.id))
    }

    #[test]
    fn test_cancelled_gesture_is_noop() {
        let before = board();
        let intent = MoveIntent::cancelled(ItemId::new(1), Location::new("A", 0));

        let outcome = apply_move(&before, &intent).unwrap();

        assert_eq!(outcome.kind, MoveKind::Cancelled);
        assert_eq!(outcome.board, before);
        assert!(all_lists_shared(&before, &outcome.board));
    }

    #[test]
    fn test_drop_in_place_is_noop() {
        let before = board();
        let intent = MoveIntent::new(ItemId::new(2), Location::new("A", 1), Location::new("A", 1));

        let outcome = apply_move(&before, &intent).unwrap();

        assert_eq!(outcome.kind, MoveKind::Unchanged);
        assert!(all_lists_shared(&before, &outcome.board));
    }

    #[test]
    fn test_within_list_reorder_is_noop() {
        let before = board();
        let intent = MoveIntent::new(ItemId::new(1), Location::new("A", 0), Location::new("A", 1));

        let outcome = apply_move(&before, &intent).unwrap();

        assert_eq!(outcome.kind, MoveKind::WithinList);
        assert!(!outcome.kind.changes_board());
        assert_eq!(ids(&outcome.board, "A"), vec![1, 2]);
        assert!(all_lists_shared(&before, &outcome.board));
    }

    #[test]
    fn test_cross_list_move() {
        let before = board();
        let intent = MoveIntent::new(ItemId::new(1), Location::new("A", 0), Location::new("B", 1));

        let outcome = apply_move(&before, &intent).unwrap();
        let after = &outcome.board;

        assert_eq!(outcome.kind, MoveKind::CrossList);
        assert_eq!(ids(after, "A"), vec![2]);
        assert_eq!(ids(after, "B"), vec![3, 1]);

        let (_, _, moved) = after.find_item(ItemId::new(1)).unwrap();
        assert_eq!(moved.list_id, StatusId::from("B"));

        // Input snapshot is untouched
        assert_eq!(ids(&before, "A"), vec![1, 2]);
        assert_eq!(ids(&before, "B"), vec![3]);
    }

    #[test]
    fn test_unaffected_list_is_shared() {
        let before = board();
        let intent = MoveIntent::new(ItemId::new(1), Location::new("A", 0), Location::new("B", 0));

        let after = apply_move(&before, &intent).unwrap().board;

        assert!(after.shares_list(&before, &StatusId::from("C")));
        assert!(!after.shares_list(&before, &StatusId::from("A")));
        assert!(!after.shares_list(&before, &StatusId::from("B")));
    }

    #[test]
    fn test_insert_at_front_and_end() {
        let before = board();

        let front = MoveIntent::new(ItemId::new(4), Location::new("C", 0), Location::new("A", 0));
        let after = apply_move(&before, &front).unwrap().board;
        assert_eq!(ids(&after, "A"), vec![4, 1, 2]);

        let end = MoveIntent::new(ItemId::new(4), Location::new("C", 0), Location::new("A", 2));
        let after = apply_move(&before, &end).unwrap().board;
        assert_eq!(ids(&after, "A"), vec![1, 2, 4]);
    }

    #[test]
    fn test_destination_past_end_appends() {
        let before = board();
        let intent = MoveIntent::new(ItemId::new(3), Location::new("B", 0), Location::new("C", 10));

        let after = apply_move(&before, &intent).unwrap().board;

        assert_eq!(ids(&after, "B"), Vec::<u64>::new());
        assert_eq!(ids(&after, "C"), vec![4, 3]);
    }

    #[test]
    fn test_unknown_list_rejected() {
        let before = board();
        let intent = MoveIntent::new(ItemId::new(1), Location::new("A", 0), Location::new("Z", 0));

        let err = apply_move(&before, &intent).unwrap_err();
        assert!(matches!(err, BoardError::ListNotFound(id) if id == "Z"));
    }

    #[test]
    fn test_source_index_out_of_range_rejected() {
        let before = board();
        let intent = MoveIntent::new(ItemId::new(3), Location::new("B", 5), Location::new("A", 0));

        let err = apply_move(&before, &intent).unwrap_err();
        assert!(matches!(err, BoardError::IndexOutOfRange { index: 5, len: 1, .. }));
    }

    #[test]
    fn test_item_mismatch_rejected() {
        let before = board();
        let intent = MoveIntent::new(ItemId::new(2), Location::new("A", 0), Location::new("B", 0));

        let err = apply_move(&before, &intent).unwrap_err();
        assert!(matches!(err, BoardError::ItemMismatch { .. }));
    }

    #[test]
    fn test_cancelled_gesture_skips_validation() {
        let before = board();
        let intent = MoveIntent::cancelled(ItemId::new(99), Location::new("nowhere", 3));

        let outcome = apply_move(&before, &intent).unwrap();
        assert_eq!(outcome.kind, MoveKind::Cancelled);
    }

    #[test]
    fn test_same_list_gestures_skip_validation() {
        let before = board();

        // Stale index on a drop in place
        let stale = MoveIntent::new(ItemId::new(1), Location::new("A", 3), Location::new("A", 3));
        let outcome = apply_move(&before, &stale).unwrap();
        assert_eq!(outcome.kind, MoveKind::Unchanged);
        assert!(all_lists_shared(&before, &outcome.board));

        // Item id not at the source index
        let mismatched =
            MoveIntent::new(ItemId::new(2), Location::new("A", 0), Location::new("A", 1));
        let outcome = apply_move(&before, &mismatched).unwrap();
        assert_eq!(outcome.kind, MoveKind::WithinList);
        assert!(all_lists_shared(&before, &outcome.board));

        // List the board does not have
        let unknown =
            MoveIntent::new(ItemId::new(1), Location::new("Z", 0), Location::new("Z", 0));
        assert_eq!(apply_move(&before, &unknown).unwrap().kind, MoveKind::Unchanged);
    }
}
