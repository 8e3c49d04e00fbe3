//! JSON shapes of the project-management REST API.

use crate::{
    domain::{
        Assignee, Board, BoardList, Item, ItemId, Priority, ProjectId, Status, StatusCatalog,
        StatusId, TaskType,
    },
    error::Result,
};
use serde::{Deserialize, Deserializer, Serialize};

/// Every response body is wrapped in this envelope
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Envelope<T> {
    #[serde(default)]
    pub message: Option<String>,
    pub content: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProjectDetail {
    pub id: u64,
    #[serde(default)]
    pub lst_task: Vec<StatusColumn>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StatusColumn {
    pub status_id: String,
    pub status_name: String,
    #[serde(default)]
    pub alias: String,
    #[serde(default, rename = "lstTaskDeTail")]
    pub tasks: Vec<TaskDetail>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TaskDetail {
    pub task_id: u64,
    pub task_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority_task: Option<PriorityTask>,
    #[serde(default)]
    pub task_type_detail: Option<TaskTypeDetail>,
    #[serde(default, rename = "assigness")]
    pub assignees: Vec<Member>,
    #[serde(default)]
    pub original_estimate: u32,
    #[serde(default)]
    pub time_tracking_spent: u32,
    #[serde(default)]
    pub time_tracking_remaining: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PriorityTask {
    pub priority_id: u32,
    pub priority: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TaskTypeDetail {
    pub id: u32,
    pub task_type: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Member {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StatusEntry {
    pub status_id: String,
    pub status_name: String,
    #[serde(default)]
    pub alias: String,
    #[serde(default, deserialize_with = "flag")]
    pub deleted: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateStatusRequest<'a> {
    pub task_id: u64,
    pub status_id: &'a str,
}

/// The API sends `deleted` both as a boolean and as "true"/"false"
fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Text(s) => s.eq_ignore_ascii_case("true"),
    })
}

impl ProjectDetail {
    /// Membership comes from the enclosing column, not the task's own field
    pub fn into_board(self) -> Result<Board> {
        let lists = self
            .lst_task
            .into_iter()
            .map(|column| {
                let list_id = StatusId::new(column.status_id);
                let items = column
                    .tasks
                    .into_iter()
                    .map(|task| task.into_item(list_id.clone()))
                    .collect();
                BoardList {
                    id: list_id,
                    name: column.status_name,
                    alias: column.alias,
                    items,
                }
            })
            .collect();

        Board::new(ProjectId::new(self.id), lists)
    }
}

impl TaskDetail {
    fn into_item(self, list_id: StatusId) -> Item {
        Item {
            id: ItemId::new(self.task_id),
            display_name: self.task_name,
            list_id,
            description: self.description.filter(|d| !d.is_empty()),
            priority: self.priority_task.map(|p| Priority {
                id: p.priority_id,
                name: p.priority,
            }),
            task_type: self.task_type_detail.map(|t| TaskType {
                id: t.id,
                name: t.task_type,
            }),
            assignees: self
                .assignees
                .into_iter()
                .map(|m| Assignee {
                    id: m.id,
                    name: m.name,
                    avatar: m.avatar,
                })
                .collect(),
            original_estimate: self.original_estimate,
            time_tracking_spent: self.time_tracking_spent,
            time_tracking_remaining: self.time_tracking_remaining,
        }
    }
}

pub(crate) fn into_catalog(entries: Vec<StatusEntry>) -> StatusCatalog {
    StatusCatalog::new(
        entries
            .into_iter()
            .map(|e| Status {
                id: StatusId::new(e.status_id),
                name: e.status_name,
                alias: e.alias,
                deleted: e.deleted,
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROJECT_DETAIL: &str = r#"{
        "statusCode": 200,
        "message": "Xử lý thành công!",
        "content": {
            "id": 42,
            "projectName": "Jira clone",
            "lstTask": [
                {
                    "statusId": "1",
                    "statusName": "BACKLOG",
                    "alias": "tồn đọng",
                    "lstTaskDeTail": [
                        {
                            "taskId": 42,
                            "taskName": "Fix bug",
                            "statusId": "1",
                            "description": "<p>crash on save</p>",
                            "priorityTask": { "priorityId": 1, "priority": "High" },
                            "taskTypeDetail": { "id": 1, "taskType": "bug" },
                            "assigness": [ { "id": 5, "name": "Lan", "avatar": "https://a/5" } ],
                            "originalEstimate": 8,
                            "timeTrackingSpent": 2,
                            "timeTrackingRemaining": 6
                        }
                    ]
                },
                { "statusId": "2", "statusName": "SELECTED FOR DEVELOPMENT", "alias": "", "lstTaskDeTail": [] }
            ]
        }
    }"#;

    #[test]
    fn test_project_detail_into_board() {
        let envelope: Envelope<ProjectDetail> = serde_json::from_str(PROJECT_DETAIL).unwrap();
        let board = envelope.content.into_board().unwrap();

        assert_eq!(board.project_id(), ProjectId::new(42));
        assert_eq!(board.lists().len(), 2);

        let (list, index, item) = board.find_item(ItemId::new(42)).unwrap();
        assert_eq!(list.name, "BACKLOG");
        assert_eq!(index, 0);
        assert_eq!(item.display_name, "Fix bug");
        assert_eq!(item.list_id, StatusId::from("1"));
        assert_eq!(item.priority.as_ref().unwrap().name, "High");
        assert_eq!(item.task_type.as_ref().unwrap().name, "bug");
        assert_eq!(item.assignees[0].name, "Lan");
        assert_eq!(item.time_tracking_remaining, 6);
    }

    #[test]
    fn test_status_entries_accept_string_flags() {
        let json = r#"[
            { "statusId": "1", "statusName": "BACKLOG", "alias": "backlog", "deleted": "false" },
            { "statusId": "9", "statusName": "OLD", "alias": "old", "deleted": true }
        ]"#;
        let entries: Vec<StatusEntry> = serde_json::from_str(json).unwrap();
        let catalog = into_catalog(entries);

        assert!(!catalog.statuses()[0].deleted);
        assert!(catalog.statuses()[1].deleted);
    }

    #[test]
    fn test_update_request_shape() {
        let body = UpdateStatusRequest {
            task_id: 42,
            status_id: "2",
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({ "taskId": 42, "statusId": "2" })
        );
    }
}
