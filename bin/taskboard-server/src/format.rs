//! Display helpers shared by the task views.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use taskboard_api::{TaskId, TaskStatus};
use tracing::warn;

/// Characters escaped when a task id is placed in a URL path segment inside
/// an HTML attribute.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'\'')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Human label for a status code. Unknown codes are shown as-is.
pub fn format_status(status: Option<&str>) -> String {
    match status {
        None | Some("") => "No Task".to_owned(),
        Some(code) => match TaskStatus::parse(code) {
            Some(known) => known.label().to_owned(),
            None => code.to_owned(),
        },
    }
}

/// Render an ISO-8601 timestamp as `dd-MM-yyyy HH:mm:ss <zone>`.
///
/// The date and time-of-day are taken textually from the input; no zone
/// conversion happens. `zone` is only appended as a label.
pub fn format_due_date(due_date: Option<&str>, zone: &str) -> String {
    let Some(value) = due_date.map(str::trim).filter(|v| !v.is_empty()) else {
        return String::new();
    };

    let (date, time) = value.split_once('T').unwrap_or((value, ""));
    let time: String = time
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == ':')
        .take(8)
        .collect();

    [reorder_date(date), time, zone.to_owned()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// `yyyy-MM-dd` → `dd-MM-yyyy`; anything else is returned unchanged.
fn reorder_date(date: &str) -> String {
    let parts: Vec<&str> = date.split('-').collect();
    match parts.as_slice() {
        [year, month, day] => format!("{day}-{month}-{year}"),
        _ => date.to_owned(),
    }
}

/// Percent-encode `raw` for use as one URL path segment.
pub fn encode_path_segment(raw: &str) -> String {
    utf8_percent_encode(raw, PATH_SEGMENT).to_string()
}

/// View / edit / delete controls for one task row.
///
/// Delete is a POST form carrying `_method=DELETE` in its action, picked up by
/// the method-override middleware.
pub fn create_task_actions(task_id: Option<&TaskId>) -> String {
    let id = match task_id {
        None => return String::new(),
        Some(TaskId::Text(text)) if text.is_empty() => return String::new(),
        Some(id) => encode_path_segment(&id.to_string()),
    };

    format!(
        concat!(
            r#"<a class="task-action" href="/tasks/{id}">View</a> "#,
            r#"<a class="task-action" href="/tasks/{id}/edit">Edit</a> "#,
            r#"<form class="task-action" action="/tasks/{id}?_method=DELETE" method="post">"#,
            r#"<button type="submit" class="link-button">Delete</button></form>"#,
        ),
        id = id
    )
}

/// IANA name of the host time zone, e.g. `Europe/London`.
pub fn local_time_zone_name() -> String {
    match iana_time_zone::get_timezone() {
        Ok(name) => name,
        Err(e) => {
            warn!(error = %e, "could not determine local time zone; using UTC");
            "UTC".to_owned()
        }
    }
}
