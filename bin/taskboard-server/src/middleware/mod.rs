//! HTTP middleware stack.

pub mod method_override;
pub mod trace;
