use std::fs::{self, OpenOptions};
use std::path::Path;

use color_eyre::eyre::{Result, eyre};
use tracing_subscriber::fmt::format::FmtSpan;

/// Sends spans and events as JSON lines to `output_path`.
///
/// Stdout belongs to tmux, so diagnostics only ever go to a file. The file is
/// appended to because every status refresh is a new process.
pub fn init_tracing_json(output_path: &Path) -> Result<()> {
    ensure_parent_dir(output_path)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(output_path)?;
    let make_writer = move || {
        file.try_clone()
            .expect("failed to clone trace output file")
    };

    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .json()
        .with_span_events(FmtSpan::CLOSE)
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(make_writer)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| eyre!("failed to set tracing subscriber: {e}"))?;
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs::File;

    use super::*;

    #[test]
    fn parent_dirs_are_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("nested").join("trace.jsonl");
        ensure_parent_dir(&path).unwrap();
        assert!(path.parent().unwrap().is_dir());
        let _ = File::create(&path).unwrap();
    }

    #[test]
    fn bare_filename_needs_no_parent() {
        ensure_parent_dir(Path::new("trace.jsonl")).unwrap();
    }
}
