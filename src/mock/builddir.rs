use super::Mock;
use crate::sandbox::CommandRunner;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug)]
pub enum SweepOutcome {
    /// Entry resolves; left alone.
    Kept,
    /// Dangling symlink, unlinked.
    Removed,
    Failed(String),
}

#[derive(Debug)]
pub struct SweepEntry {
    pub path: PathBuf,
    pub outcome: SweepOutcome,
}

/// Remove dangling symlinks directly under `dir`, recording each entry.
pub(crate) fn sweep_dangling(dir: &Path) -> Vec<SweepEntry> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    entries
        .filter_map(|entry| entry.ok())
        .map(|entry| {
            let path = entry.path();
            let outcome = if fs::metadata(&path).is_ok() {
                SweepOutcome::Kept
            } else {
                match fs::symlink_metadata(&path).and_then(|_| fs::remove_file(&path)) {
                    Ok(()) => SweepOutcome::Removed,
                    Err(e) => SweepOutcome::Failed(e.to_string()),
                }
            };
            SweepEntry { path, outcome }
        })
        .collect()
}

impl<R: CommandRunner> Mock<R> {
    /// Remove broken symlinks left in `BUILD` by earlier mock runs.
    /// Best effort: nothing is reported to the caller.
    pub fn cleanup_builddir(&self) {
        let dir = match self.builddir(Some("BUILD")) {
            Ok(dir) => dir,
            Err(e) => {
                debug!(error = %e, "Skipping builddir cleanup");
                return;
            }
        };

        for entry in sweep_dangling(&dir) {
            match entry.outcome {
                SweepOutcome::Kept => {}
                SweepOutcome::Removed => {
                    debug!(path = %entry.path.display(), "Removed dangling symlink")
                }
                SweepOutcome::Failed(reason) => {
                    debug!(path = %entry.path.display(), reason = %reason, "Cleanup failed")
                }
            }
        }
    }
}
