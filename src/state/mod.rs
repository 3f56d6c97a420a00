//! Per-session persisted state.
//!
//! Each run is a short-lived process, so the previous snapshot is carried to
//! the next invocation through a file scoped to the tmux server.

pub mod session;
pub mod store;
