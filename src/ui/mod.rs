//! Rendering of the tmux status line.

pub mod statusbar;
pub mod theme;
