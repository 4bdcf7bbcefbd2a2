use crate::core::error::{Result, VshError};
use crate::venv::layout::{self, LIB_DIR, SITE_PACKAGES};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

static INTERPRETER_DIR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?P<interpreter>python|pypy)\.?(?P<major>\d+)(\.?(?P<minor>\d+))")
        .expect("interpreter directory regex")
});

/// The pieces of an environment the validator located.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenvLayout {
    pub bin: PathBuf,
    pub site_packages: PathBuf,
}

impl VenvLayout {
    /// Name of the versioned interpreter folder under `lib`, e.g. `python3.11`.
    pub fn interpreter_dir_name(&self) -> Option<&str> {
        self.site_packages
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
    }
}

pub fn is_valid(path: &Path) -> bool {
    inspect(path).is_ok()
}

/// Like [`is_valid`] but reports which component was missing.
pub fn check(path: &Path) -> Result<VenvLayout> {
    inspect(path).map_err(|reason| VshError::invalid_environment(path, reason))
}

pub fn validate_environment(path: &Path, check_mode: bool) -> Result<bool> {
    if check_mode {
        check(path).map(|_| true)
    } else {
        Ok(is_valid(path))
    }
}

fn inspect(path: &Path) -> std::result::Result<VenvLayout, String> {
    let found = inspect_structure(path)?;

    // Windows environments are only checked structurally.
    if cfg!(windows) {
        return Ok(found);
    }

    inspect_interpreter(path, &found)?;
    Ok(found)
}

fn inspect_structure(path: &Path) -> std::result::Result<VenvLayout, String> {
    if !path.is_dir() {
        return Err(format!("Could not find {}", path.display()));
    }

    let bin = layout::bin_dir(path);
    if !bin.is_dir() {
        return Err(format!("Could not find {} under {}", layout::BIN_DIR, path.display()));
    }

    if !layout::include_dir(path).is_dir() {
        return Err(format!(
            "Could not find {} under {}",
            layout::INCLUDE_DIR,
            path.display()
        ));
    }

    let site_packages = find_site_packages(path).ok_or_else(|| {
        format!("Could not find {} under {}", layout::lib_pattern(), path.display())
    })?;

    Ok(VenvLayout { bin, site_packages })
}

fn inspect_interpreter(path: &Path, found: &VenvLayout) -> std::result::Result<(), String> {
    if !has_activation_scripts(&found.bin) {
        return Err(format!("Could not find activation scripts under {}", path.display()));
    }

    let interpreter_dir = found.interpreter_dir_name().unwrap_or_default();
    if !INTERPRETER_DIR_RE.is_match(interpreter_dir) {
        return Err(format!(
            "Could not recognize interpreter folder '{}' under {}",
            interpreter_dir,
            path.display()
        ));
    }

    if !found.bin.join(interpreter_dir).exists() {
        return Err(format!(
            "Could not find {} executable under {}",
            interpreter_dir,
            path.display()
        ));
    }

    Ok(())
}

fn find_site_packages(path: &Path) -> Option<PathBuf> {
    let lib = path.join(LIB_DIR);
    if cfg!(windows) {
        let candidate = lib.join(SITE_PACKAGES);
        return candidate.is_dir().then_some(candidate);
    }

    let mut candidates: Vec<PathBuf> = std::fs::read_dir(&lib)
        .ok()?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path().join(SITE_PACKAGES))
        .filter(|candidate| candidate.is_dir())
        .collect();
    candidates.sort();
    candidates.into_iter().next()
}

fn has_activation_scripts(bin: &Path) -> bool {
    std::fs::read_dir(bin)
        .map(|entries| {
            entries.filter_map(|entry| entry.ok()).any(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| name.starts_with("activate."))
            })
        })
        .unwrap_or(false)
}
