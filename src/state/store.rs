use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use color_eyre::Result;
use color_eyre::eyre::{WrapErr, eyre};
use tempfile::NamedTempFile;

use super::session::SessionId;
use crate::system::snapshot::Snapshot;

/// Owns the per-session state file holding the latest [`Snapshot`].
#[derive(Clone, Debug)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn for_session(session: &SessionId) -> Self {
        Self::at(session.state_path())
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        SnapshotStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the persisted snapshot, or `None` when there is none usable.
    ///
    /// A file that does not parse as a valid snapshot is deleted so the next
    /// save starts clean.
    pub fn load(&self) -> Option<Snapshot> {
        #[cfg(feature = "tracing")]
        let _load_span = tracing::debug_span!("store.load").entered();

        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(_e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(path = %self.path.display(), error = %_e, "state file unreadable");
                return None;
            }
        };

        match serde_json::from_slice::<Snapshot>(&bytes) {
            Ok(snapshot) if snapshot.is_valid() => Some(snapshot),
            _ => {
                #[cfg(feature = "tracing")]
                tracing::warn!(path = %self.path.display(), "discarding corrupt state file");
                let _ = fs::remove_file(&self.path);
                None
            }
        }
    }

    /// Atomically replaces the state file with `snapshot`.
    ///
    /// The JSON is written to a temporary file in the same directory and
    /// renamed over the destination, so readers see the old or the new file
    /// and never a partial one.
    pub fn save(&self, snapshot: &Snapshot) -> Result<()> {
        #[cfg(feature = "tracing")]
        let _save_span = tracing::debug_span!("store.save").entered();

        let dir = self
            .path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .ok_or_else(|| eyre!("state path has no parent: {}", self.path.display()))?;
        fs::create_dir_all(dir)
            .wrap_err_with(|| format!("failed to create state dir {}", dir.display()))?;

        let mut tmp = NamedTempFile::new_in(dir)
            .wrap_err_with(|| format!("failed to create temp file in {}", dir.display()))?;
        serde_json::to_writer(&mut tmp, snapshot).wrap_err("failed to serialize snapshot")?;
        tmp.flush()?;
        tmp.as_file()
            .sync_all()
            .wrap_err("failed to flush snapshot to disk")?;
        tmp.persist(&self.path)
            .wrap_err_with(|| format!("failed to replace {}", self.path.display()))?;
        Ok(())
    }
}
