//! Wire types for the remote task API.
//!
//! The API owns every field; the front-end treats them as display data and
//! never validates them beyond what is needed to address a task by id.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Opaque task identifier. The API may hand out numbers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskId {
    Number(i64),
    Text(String),
}

impl TaskId {
    /// Numeric view of the id, also for numeric text such as `"42"`.
    fn as_number(&self) -> Option<i64> {
        match self {
            TaskId::Number(n) => Some(*n),
            TaskId::Text(s) => s.trim().parse().ok(),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            TaskId::Number(_) => 0,
            TaskId::Text(_) => 1,
        }
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskId::Number(n) => write!(f, "{n}"),
            TaskId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for TaskId {
    fn from(n: i64) -> Self {
        TaskId::Number(n)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        TaskId::Text(s.to_owned())
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        TaskId::Text(s)
    }
}

impl PartialOrd for TaskId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Numeric ids (including numeric text) sort numerically and before any
/// non-numeric id; the rest sort lexically.
impl Ord for TaskId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.as_number(), other.as_number()) {
            (Some(a), Some(b)) => a
                .cmp(&b)
                .then_with(|| self.rank().cmp(&other.rank()))
                .then_with(|| self.to_string().cmp(&other.to_string())),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.to_string().cmp(&other.to_string()),
        }
    }
}

/// A task as returned by `GET /tasks` and `GET /tasks/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(default)]
    pub id: Option<TaskId>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Raw status code. Values outside [`TaskStatus`] are kept verbatim.
    #[serde(default)]
    pub status: Option<String>,
    /// ISO-8601 timestamp, e.g. `2025-09-15T10:30:00.000Z`.
    #[serde(default)]
    pub due_date: Option<String>,
}

/// The status codes the API is known to accept.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
pub enum TaskStatus {
    #[strum(serialize = "TODO")]
    #[serde(rename = "TODO")]
    Todo,
    #[strum(serialize = "IN_PROGRESS")]
    #[serde(rename = "IN_PROGRESS")]
    InProgress,
    #[strum(serialize = "COMPLETED")]
    #[serde(rename = "COMPLETED")]
    Completed,
}

impl TaskStatus {
    /// Parse a wire code. Matching is exact (`"todo"` is not a known code).
    pub fn parse(code: &str) -> Option<Self> {
        code.parse().ok()
    }

    /// Wire code, e.g. `"IN_PROGRESS"`.
    pub fn code(&self) -> &'static str {
        self.into()
    }

    /// Human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
        }
    }
}

/// Body of `POST /tasks`.
///
/// `dueDate` is always sent; `None` goes over the wire as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub status: String,
    pub due_date: Option<String>,
}

/// Body of `PATCH /tasks/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusUpdate {
    pub status: String,
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn task_accepts_numeric_and_text_ids() {
        let numeric: Task = serde_json::from_value(json!({ "id": 3, "title": "a" })).unwrap();
        assert_eq!(numeric.id, Some(TaskId::Number(3)));

        let text: Task = serde_json::from_value(json!({ "id": "abc-1" })).unwrap();
        assert_eq!(text.id, Some(TaskId::Text("abc-1".into())));
        assert_eq!(text.title, None);
    }

    #[test]
    fn task_reads_camel_case_due_date_and_ignores_unknown_fields() {
        let task: Task = serde_json::from_value(json!({
            "id": 1,
            "status": "TODO",
            "dueDate": "2025-09-15T10:30:00.000Z",
            "createdAt": "2025-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(task.due_date.as_deref(), Some("2025-09-15T10:30:00.000Z"));
        assert_eq!(task.status.as_deref(), Some("TODO"));
    }

    #[test]
    fn ids_sort_numerically_before_text() {
        let mut ids = vec![
            TaskId::from("b"),
            TaskId::from(10),
            TaskId::from("9"),
            TaskId::from(2),
            TaskId::from("a"),
        ];
        ids.sort();
        let rendered: Vec<String> = ids.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, ["2", "9", "10", "a", "b"]);
    }

    #[test]
    fn status_codes_and_labels() {
        assert_eq!(TaskStatus::parse("IN_PROGRESS"), Some(TaskStatus::InProgress));
        assert_eq!(TaskStatus::parse("in_progress"), None);
        assert_eq!(TaskStatus::Todo.code(), "TODO");
        assert_eq!(TaskStatus::Todo.to_string(), "TODO");
        assert_eq!(TaskStatus::Completed.label(), "Completed");
    }

    #[test]
    fn status_code_matches_wire_name() {
        use strum::IntoEnumIterator;
        for status in TaskStatus::iter() {
            assert_eq!(serde_json::to_value(status).unwrap(), status.code());
            assert_eq!(status.to_string(), status.code());
        }
    }

    #[test]
    fn new_task_sends_null_due_date() {
        let body = serde_json::to_value(NewTask {
            title: "t".into(),
            description: String::new(),
            status: "TODO".into(),
            due_date: None,
        })
        .unwrap();
        assert_eq!(body["dueDate"], serde_json::Value::Null);
        assert!(body.as_object().unwrap().contains_key("dueDate"));
    }
}
