use crate::venv::validator;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Lazily yields `(name, path)` for every valid environment below a root.
///
/// Valid environments are leaves: once one is found its own tree is never walked.
pub struct EnvironmentFinder {
    walker: walkdir::IntoIter,
}

impl EnvironmentFinder {
    pub fn new(root: &Path) -> Self {
        Self {
            walker: WalkDir::new(root).min_depth(1).into_iter(),
        }
    }
}

impl Iterator for EnvironmentFinder {
    type Item = (String, PathBuf);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::debug!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            // links are not followed, so a linked directory is only checked, never walked
            let is_dir = entry.file_type().is_dir();
            if !is_dir && !(entry.path_is_symlink() && entry.path().is_dir()) {
                continue;
            }

            tracing::trace!("Searching {} for virtual environment", entry.path().display());
            if !validator::is_valid(entry.path()) {
                continue;
            }

            if is_dir {
                self.walker.skip_current_dir();
            }
            let name = entry.file_name().to_string_lossy().to_string();
            tracing::debug!("Found {} under {}", name, entry.path().display());
            return Some((name, entry.into_path()));
        }
    }
}

pub fn find_environment_folders(root: &Path) -> EnvironmentFinder {
    EnvironmentFinder::new(root)
}
