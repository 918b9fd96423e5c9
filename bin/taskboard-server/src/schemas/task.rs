//! Form bodies accepted from the browser and the data shapes handed to the
//! task views.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use taskboard_api::{NewTask, Task, TaskId, TaskStatus};
use thiserror::Error;

use crate::format::{create_task_actions, format_due_date, format_status};

/// The day/month/year fields do not name a real calendar date.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("due date is not a valid date")]
pub struct InvalidDueDate;

/// Body of `POST /tasks`.
#[derive(Debug, Default, Deserialize)]
pub struct CreateTaskForm {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(rename = "dueDate-day", default)]
    pub due_day: Option<String>,
    #[serde(rename = "dueDate-month", default)]
    pub due_month: Option<String>,
    #[serde(rename = "dueDate-year", default)]
    pub due_year: Option<String>,
}

impl CreateTaskForm {
    /// Build the API payload. `now` supplies the time-of-day and zone of the
    /// due date.
    pub fn into_new_task<Tz: TimeZone>(
        self,
        now: &DateTime<Tz>,
    ) -> Result<NewTask, InvalidDueDate> {
        let due_date = due_date_from_parts(
            self.due_day.as_deref(),
            self.due_month.as_deref(),
            self.due_year.as_deref(),
            now,
        )?;
        let status = self
            .status
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| TaskStatus::Todo.code().to_owned());

        Ok(NewTask {
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            status,
            due_date,
        })
    }
}

/// Body of `PATCH /tasks/{id}`.
#[derive(Debug, Default, Deserialize)]
pub struct StatusForm {
    #[serde(default)]
    pub status: String,
}

/// Combine the split date fields with the current time-of-day plus one hour
/// and return the UTC instant as `yyyy-MM-ddTHH:mm:ss.000Z`.
///
/// An absent or empty day means "no due date". Past 23:00 the extra hour
/// rolls the date over to the next day; a roll-over past the last
/// representable date is rejected like any other impossible date.
pub fn due_date_from_parts<Tz: TimeZone>(
    day: Option<&str>,
    month: Option<&str>,
    year: Option<&str>,
    now: &DateTime<Tz>,
) -> Result<Option<String>, InvalidDueDate> {
    let Some(day) = day.map(str::trim).filter(|d| !d.is_empty()) else {
        return Ok(None);
    };
    let day: u32 = day.parse().map_err(|_| InvalidDueDate)?;
    let month: u32 = parse_part(month)?;
    let year: i32 = parse_part(year)?;

    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or(InvalidDueDate)?;
    let time = NaiveTime::from_hms_opt(now.hour(), now.minute(), now.second())
        .ok_or(InvalidDueDate)?;
    let local = date
        .and_time(time)
        .checked_add_signed(TimeDelta::hours(1))
        .ok_or(InvalidDueDate)?;

    let zone = now.timezone();
    // A wall-clock time skipped by a DST jump resolves to the hour after it.
    let instant = zone
        .from_local_datetime(&local)
        .earliest()
        .or_else(|| {
            let later = local.checked_add_signed(TimeDelta::hours(1))?;
            zone.from_local_datetime(&later).earliest()
        })
        .ok_or(InvalidDueDate)?;

    Ok(Some(
        instant
            .with_timezone(&Utc)
            .format("%Y-%m-%dT%H:%M:%S%.3fZ")
            .to_string(),
    ))
}

fn parse_part<T: std::str::FromStr>(part: Option<&str>) -> Result<T, InvalidDueDate> {
    part.map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or(InvalidDueDate)?
        .parse()
        .map_err(|_| InvalidDueDate)
}

// ── view models ──────────────────────────────────────────────────────────────

/// One table cell in the `home` view. Exactly one of `text` / `html` is set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colspan: Option<u32>,
}

impl Cell {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            html: None,
            colspan: None,
        }
    }

    pub fn html(html: impl Into<String>) -> Self {
        Self {
            text: None,
            html: Some(html.into()),
            colspan: None,
        }
    }
}

pub const TABLE_COLUMNS: u32 = 6;
pub const NO_TASKS: &str = "No tasks available";

/// Table rows for the `home` view, sorted by id ascending. Tasks without an
/// id go last. An empty list yields the single placeholder row.
pub fn task_rows(mut tasks: Vec<Task>, zone: &str) -> Vec<Vec<Cell>> {
    if tasks.is_empty() {
        return vec![vec![Cell {
            text: Some(NO_TASKS.to_owned()),
            html: None,
            colspan: Some(TABLE_COLUMNS),
        }]];
    }

    tasks.sort_by(|a, b| match (&a.id, &b.id) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });

    tasks
        .into_iter()
        .map(|task| {
            vec![
                Cell::text(task.id.as_ref().map(ToString::to_string).unwrap_or_default()),
                Cell::text(task.title.unwrap_or_default()),
                Cell::text(task.description.unwrap_or_default()),
                Cell::text(format_status(task.status.as_deref())),
                Cell::text(format_due_date(task.due_date.as_deref(), zone)),
                Cell::html(create_task_actions(task.id.as_ref())),
            ]
        })
        .collect()
}

/// `task` in the `task-form` view.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskFormView {
    pub id: Option<String>,
    pub title: String,
    pub description: String,
    pub status: String,
}

impl From<Task> for TaskFormView {
    fn from(task: Task) -> Self {
        Self {
            id: task.id.as_ref().map(ToString::to_string),
            title: task.title.unwrap_or_default(),
            description: task.description.unwrap_or_default(),
            status: task.status.unwrap_or_default(),
        }
    }
}

/// An entry of the status `<select>` in the `task-form` view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Every known status, with `current` pre-selected (`TODO` when unknown).
pub fn status_options(current: Option<&str>) -> Vec<StatusOption> {
    let current = current
        .and_then(TaskStatus::parse)
        .unwrap_or(TaskStatus::Todo);
    TaskStatus::iter()
        .map(|status| StatusOption {
            value: status.code(),
            label: status.label(),
            selected: status == current,
        })
        .collect()
}

/// `task` in the `task-details` view; every field is display-ready.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDetailsView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: String,
    pub due_date: String,
}

impl TaskDetailsView {
    pub fn new(task: Task, fallback_id: &TaskId, zone: &str) -> Self {
        Self {
            id: task.id.as_ref().unwrap_or(fallback_id).to_string(),
            title: task.title.unwrap_or_default(),
            description: task.description.unwrap_or_default(),
            status: format_status(task.status.as_deref()),
            due_date: format_due_date(task.due_date.as_deref(), zone),
        }
    }
}
