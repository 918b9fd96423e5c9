//! Typed client for the remote task API.
//!
//! The API exposes `GET/POST /tasks` and `GET/PATCH/DELETE /tasks/{id}` and
//! answers with JSON. Every call is a single request: no retries, no custom
//! timeouts.

pub mod client;
pub mod error;
pub mod task;

pub use client::TaskClient;
pub use error::{ApiError, ErrorBody, ErrorDetails};
pub use task::{NewTask, StatusUpdate, Task, TaskId, TaskStatus};
