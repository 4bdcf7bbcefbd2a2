use crate::core::error::Result;
use crate::core::ProcessExecutor;
use colored::Colorize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const RC_FILE_NAME: &str = ".vshrc";

const REPO_ROOT_PROBES: [(&str, &[&str]); 2] = [
    ("git", &["rev-parse", "--show-toplevel"]),
    ("hg", &["root"]),
];

/// Where startup snippets are looked up, in sourcing order.
#[derive(Debug, Clone)]
pub struct RcSearch {
    pub system_dir: PathBuf,
    pub home: PathBuf,
    pub repo_root: Option<PathBuf>,
    pub venv_path: PathBuf,
    /// Directory written into a fresh environment snippet when no repository was detected.
    pub fallback_working: PathBuf,
}

impl RcSearch {
    fn directories(&self) -> Vec<&Path> {
        let mut dirs = vec![self.system_dir.as_path(), self.home.as_path()];
        if let Some(repo) = &self.repo_root {
            dirs.push(repo.as_path());
        }
        dirs.push(self.venv_path.as_path());
        dirs
    }
}

/// Writes `cd <working>` into the environment's snippet unless one already exists.
///
/// Returns the snippet path when a file was written.
pub async fn build_vsh_rc_file(venv_path: &Path, working: &Path) -> Result<Option<PathBuf>> {
    let rc_path = venv_path.join(RC_FILE_NAME);
    if !venv_path.is_dir() || rc_path.exists() || !working.is_dir() {
        return Ok(None);
    }

    let working = std::fs::canonicalize(working)?;
    let quoted = shlex::try_quote(&working.to_string_lossy())
        .map(|q| q.into_owned())
        .unwrap_or_else(|_| working.display().to_string());
    tokio::fs::write(&rc_path, format!("cd {}\n", quoted)).await?;

    println!(
        "Set default path to: {}",
        working.display().to_string().cyan()
    );
    println!(
        "To edit, update: {}",
        rc_path.display().to_string().yellow()
    );
    Ok(Some(rc_path))
}

/// Top of the version-controlled tree containing `cwd`; git is asked first, then mercurial.
pub async fn detect_repo_root(cwd: &Path) -> Option<PathBuf> {
    for (cmd, args) in REPO_ROOT_PROBES {
        if ProcessExecutor::find_command(cmd).is_none() {
            continue;
        }

        let output = match ProcessExecutor::execute(cmd, args, Some(cwd)).await {
            Ok(output) if output.status.success() => output,
            _ => continue,
        };

        let root = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if root.is_empty() {
            continue;
        }

        let root = PathBuf::from(root);
        if root.exists() {
            tracing::debug!("Detected repository root {} via {}", root.display(), cmd);
            return Some(root);
        }
    }
    None
}

/// Collects the snippet files to source, deduplicated by resolved path.
///
/// A snippet that is a directory contributes every file below it.
pub async fn find_vsh_rc_files(search: &RcSearch) -> Result<Vec<PathBuf>> {
    let working = search
        .repo_root
        .as_deref()
        .unwrap_or(search.fallback_working.as_path());
    build_vsh_rc_file(&search.venv_path, working).await?;

    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut found = Vec::new();

    for dir in search.directories() {
        let rc_path = dir.join(RC_FILE_NAME);
        let rc_path = match std::fs::canonicalize(&rc_path) {
            Ok(path) => path,
            Err(_) => continue,
        };

        if rc_path.is_file() {
            if seen.insert(rc_path.clone()) {
                found.push(rc_path);
            }
        } else if rc_path.is_dir() {
            let files = WalkDir::new(&rc_path)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.file_type().is_file())
                .map(|entry| entry.into_path());
            for file in files {
                if seen.insert(file.clone()) {
                    found.push(file);
                }
            }
        }
    }

    tracing::debug!("Startup snippets: {:?}", found);
    Ok(found)
}
