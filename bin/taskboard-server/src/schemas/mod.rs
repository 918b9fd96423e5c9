//! Request bodies and view data shapes.

pub mod task;
