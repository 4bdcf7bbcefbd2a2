use crate::config::env::Environment;
use crate::core::error::{Result, VshError};
use crate::core::path::absolutize;
use std::path::{Path, PathBuf};

pub fn validate_venv_name(name: &str) -> Result<()> {
    if name.starts_with('-') {
        return Err(VshError::InvalidName(format!(
            "'{}': names may not start with '-'",
            name
        )));
    }

    if name.contains(' ') {
        return Err(VshError::InvalidName(format!(
            "'{}': names may not include spaces",
            name
        )));
    }

    Ok(())
}

/// Turns the user's name/path pair into a qualified `(name, path)`.
///
/// This only checks naming conventions; it does not check that the environment exists.
pub fn validate_venv_name_and_path(
    name: Option<&str>,
    path: Option<&Path>,
    env: &Environment,
) -> Result<(String, PathBuf)> {
    match (name, path) {
        (_, Some(path)) => {
            let path = absolutize(path, &env.home, &env.cwd);
            let name = venv_name_of(&path)?;
            Ok((name, path))
        }
        (Some(name), None) if !name.is_empty() => {
            validate_venv_name(name)?;
            if name.contains('/') {
                let path = absolutize(Path::new(name), &env.home, &env.cwd);
                let name = venv_name_of(&path)?;
                Ok((name, path))
            } else {
                Ok((name.to_string(), env.venv_home(name)))
            }
        }
        _ => Err(VshError::VenvNameError {
            name: name.unwrap_or_default().to_string(),
        }),
    }
}

fn venv_name_of(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| VshError::VenvNameError {
            name: path.display().to_string(),
        })
}
