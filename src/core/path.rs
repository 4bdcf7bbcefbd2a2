use std::path::{Component, Path, PathBuf};

pub fn resolve_path(base_dir: &Path, configured: &Path) -> PathBuf {
    if configured.is_absolute() {
        configured.to_path_buf()
    } else {
        base_dir.join(configured)
    }
}

/// Expands a leading `~`, anchors relative paths at `cwd` and resolves symlinks when the
/// target exists. Paths that do not exist yet are normalized lexically.
pub fn absolutize(path: &Path, home: &Path, cwd: &Path) -> PathBuf {
    let expanded = match path.strip_prefix("~") {
        Ok(rest) => home.join(rest),
        Err(_) => path.to_path_buf(),
    };
    let anchored = resolve_path(cwd, &expanded);

    std::fs::canonicalize(&anchored).unwrap_or_else(|_| normalize(&anchored))
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
