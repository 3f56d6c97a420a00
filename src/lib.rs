//! Short-lived sampler behind a tmux status segment.
//!
//! Each invocation pairs the snapshot persisted by the previous run with a
//! fresh one, turns the pair into rates and prints a single line.

pub mod config;
pub mod format;
pub mod probe;
pub mod rates;
pub mod sampler;
pub mod state;
pub mod system;
#[cfg(feature = "tracing")]
pub mod trace;
pub mod ui;
