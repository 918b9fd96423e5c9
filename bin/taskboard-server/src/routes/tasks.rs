//! Task pages.
//!
//! Every handler makes at most one call to the task API. API failures are
//! rendered as a page carrying a message (HTTP 200, except the edit form
//! which answers 404); only template failures surface as [`ServerError`].

use std::sync::Arc;

use axum::extract::rejection::FormRejection;
use axum::extract::{Form, Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::Router;
use chrono::Local;
use minijinja::context;
use taskboard_api::{ApiError, TaskId};
use tracing::{info, warn};

use crate::error::ServerError;
use crate::format::encode_path_segment;
use crate::schemas::task::{
    Cell, CreateTaskForm, StatusForm, TaskDetailsView, TaskFormView, status_options, task_rows,
};
use crate::state::AppState;
use crate::views::View;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_tasks))
        .route("/tasks", post(create_task))
        .route("/tasks/new", get(new_task_form))
        .route(
            "/tasks/{id}",
            get(show_task).patch(update_task_status).delete(delete_task),
        )
        .route("/tasks/{id}/edit", get(edit_task_form))
}

/// Message shown when the task API cannot be reached during create.
pub const CONNECTION_REFUSED_MESSAGE: &str =
    "Unable to connect to the task service. Please try again later.";

/// `GET /`
pub async fn list_tasks(State(state): State<Arc<AppState>>) -> Result<Html<String>, ServerError> {
    match state.api.list_tasks().await {
        Ok(tasks) => render_home(&state, task_rows(tasks, &state.time_zone), None),
        Err(e) => {
            warn!(error = %e, "failed to list tasks");
            render_home(&state, Vec::new(), Some(format!("Failed to get task/s {e}")))
        }
    }
}

/// `GET /tasks/new`
pub async fn new_task_form(
    State(state): State<Arc<AppState>>,
) -> Result<Html<String>, ServerError> {
    Ok(state.views.render(
        View::TaskForm,
        context! {
            task => None::<TaskFormView>,
            statuses => status_options(None),
        },
    )?)
}

/// `GET /tasks/{id}/edit`
pub async fn edit_task_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, ServerError> {
    let id = TaskId::from(id);
    match state.api.get_task(&id).await {
        Ok(task) => {
            let mut task = TaskFormView::from(task);
            if task.id.is_none() {
                task.id = Some(id.to_string());
            }
            Ok(render_task_form(&state, task, None)?.into_response())
        }
        Err(e) => {
            warn!(task_id = %id, error = %e, "failed to load task for editing");
            let page = state.views.render(
                View::NotFound,
                context! { message => format!("Failed to edit task - {e}") },
            )?;
            Ok((StatusCode::NOT_FOUND, page).into_response())
        }
    }
}

/// `GET /tasks/{id}`
pub async fn show_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Html<String>, ServerError> {
    let id = TaskId::from(id);
    match state.api.get_task(&id).await {
        Ok(task) => {
            let task = TaskDetailsView::new(task, &id, &state.time_zone);
            let edit_url = format!("/tasks/{}/edit", encode_path_segment(&task.id));
            Ok(state
                .views
                .render(View::TaskDetails, context! { task, edit_url })?)
        }
        Err(e) => {
            warn!(task_id = %id, error = %e, "failed to fetch task");
            Ok(state.views.render(
                View::NotFound,
                context! { message => format!("Failed to fetch task by ID {id} - {e}") },
            )?)
        }
    }
}

/// `POST /tasks`
pub async fn create_task(
    State(state): State<Arc<AppState>>,
    form: Result<Form<CreateTaskForm>, FormRejection>,
) -> Result<Response, ServerError> {
    let Form(form) = form?;

    let new_task = match form.into_new_task(&Local::now()) {
        Ok(task) => task,
        Err(e) => {
            return Ok(render_home(&state, Vec::new(), Some(format!("Failed to create task - {e}")))?
                .into_response());
        }
    };

    match state.api.create_task(&new_task).await {
        Ok(()) => {
            info!(title = %new_task.title, status = %new_task.status, "task created");
            Ok(Redirect::to("/").into_response())
        }
        Err(e) => {
            warn!(error = %e, "failed to create task");
            Ok(render_home(&state, Vec::new(), Some(create_error_message(&e)))?.into_response())
        }
    }
}

/// `PATCH /tasks/{id}`, usually reached through the method override.
pub async fn update_task_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    form: Result<Form<StatusForm>, FormRejection>,
) -> Result<Response, ServerError> {
    let Form(form) = form?;
    let id = TaskId::from(id);

    match state.api.update_status(&id, &form.status).await {
        Ok(()) => {
            info!(task_id = %id, status = %form.status, "task status updated");
            Ok(Redirect::to("/").into_response())
        }
        Err(e) => {
            warn!(task_id = %id, error = %e, "failed to update task status");
            let task = TaskFormView {
                id: Some(id.to_string()),
                status: form.status,
                ..Default::default()
            };
            Ok(render_task_form(&state, task, Some(format!("Failed to update task - {e}")))?
                .into_response())
        }
    }
}

/// `DELETE /tasks/{id}`, usually reached through the method override.
pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, ServerError> {
    let id = TaskId::from(id);

    match state.api.delete_task(&id).await {
        Ok(()) => {
            info!(task_id = %id, "task deleted");
            Ok(Redirect::to("/").into_response())
        }
        Err(e) => {
            warn!(task_id = %id, error = %e, "failed to delete task");
            Ok(render_home(&state, Vec::new(), Some(format!("Failed to delete task - {e}")))?
                .into_response())
        }
    }
}

/// User-facing message for a failed create, most specific cause first.
pub fn create_error_message(e: &ApiError) -> String {
    if e.is_connection_refused() {
        CONNECTION_REFUSED_MESSAGE.to_owned()
    } else if let Some(detail) = e.validation_detail() {
        detail
    } else {
        format!("Failed to create task - {e}")
    }
}

// ── private helpers ──────────────────────────────────────────────────────────

fn render_home(
    state: &AppState,
    rows: Vec<Vec<Cell>>,
    error: Option<String>,
) -> Result<Html<String>, ServerError> {
    Ok(state.views.render(View::Home, context! { rows, error })?)
}

fn render_task_form(
    state: &AppState,
    task: TaskFormView,
    error: Option<String>,
) -> Result<Html<String>, ServerError> {
    let action = format!(
        "/tasks/{}?_method=PATCH",
        encode_path_segment(task.id.as_deref().unwrap_or_default())
    );
    let statuses = status_options(Some(task.status.as_str()));
    Ok(state.views.render(
        View::TaskForm,
        context! { task, statuses, action, error },
    )?)
}
