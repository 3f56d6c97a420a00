use std::path::{Path, PathBuf};

use color_eyre::Result;
use color_eyre::eyre::eyre;

/// Subdirectory of the temp root reserved for state files.
pub const STATE_DIR_NAME: &str = "tmux-status-line";

/// Identifies one tmux server. Scopes the persisted state.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Builds the id from the value of `$TMUX`, which looks like
    /// `/tmp/tmux-1000/default,4242,0`. Only the socket path is kept, so every
    /// client of one server shares a baseline.
    pub fn from_tmux_env(value: &str) -> Result<Self> {
        let (socket, _) = value.split_once(',').unwrap_or((value, ""));
        if socket.is_empty() {
            return Err(eyre!("TMUX does not name a server socket: {value:?}"));
        }
        Ok(SessionId(socket.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Filename-safe form of the id. `%` and path separators are
    /// percent-escaped, which keeps distinct sessions on distinct files.
    pub fn file_stem(&self) -> String {
        let mut stem = String::with_capacity(self.0.len());
        for ch in self.0.chars() {
            match ch {
                '%' => stem.push_str("%25"),
                '/' => stem.push_str("%2F"),
                '\\' => stem.push_str("%5C"),
                ':' => stem.push_str("%3A"),
                _ => stem.push(ch),
            }
        }
        stem
    }

    pub fn state_path(&self) -> PathBuf {
        self.state_path_in(&std::env::temp_dir())
    }

    pub fn state_path_in(&self, root: &Path) -> PathBuf {
        self.sibling_in(root, "json")
    }

    /// Optional file naming the host to ping for the latency segment.
    pub fn probe_target_path(&self) -> PathBuf {
        self.probe_target_path_in(&std::env::temp_dir())
    }

    pub fn probe_target_path_in(&self, root: &Path) -> PathBuf {
        self.sibling_in(root, "ip")
    }

    fn sibling_in(&self, root: &Path, extension: &str) -> PathBuf {
        // Appended rather than set: the stem may itself contain dots.
        root.join(STATE_DIR_NAME)
            .join(format!("{}.{extension}", self.file_stem()))
    }
}
