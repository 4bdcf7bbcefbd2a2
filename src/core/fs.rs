use crate::core::error::Result;
use std::path::Path;
use tokio::fs;

pub async fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path).await?;
    }
    Ok(())
}

pub async fn is_dir_empty(path: &Path) -> Result<bool> {
    let mut entries = fs::read_dir(path).await?;
    Ok(entries.next_entry().await?.is_none())
}

/// Removes everything inside `path` but keeps the directory itself.
pub async fn clear_directory(path: &Path) -> Result<()> {
    let mut entries = fs::read_dir(path).await?;
    while let Some(entry) = entries.next_entry().await? {
        let file_type = entry.file_type().await?;
        if file_type.is_dir() {
            fs::remove_dir_all(entry.path()).await?;
        } else {
            fs::remove_file(entry.path()).await?;
        }
    }
    Ok(())
}

#[cfg(unix)]
pub async fn symlink_dir(target: &Path, link: &Path) -> Result<()> {
    fs::symlink(target, link).await?;
    Ok(())
}

#[cfg(not(unix))]
pub async fn symlink_dir(_target: &Path, _link: &Path) -> Result<()> {
    Ok(())
}
