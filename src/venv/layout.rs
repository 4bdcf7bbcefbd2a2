//! Platform-specific names inside a virtual environment directory.

use std::path::{Path, PathBuf};

#[cfg(windows)]
pub const BIN_DIR: &str = "Scripts";
#[cfg(not(windows))]
pub const BIN_DIR: &str = "bin";

#[cfg(windows)]
pub const INCLUDE_DIR: &str = "Include";
#[cfg(not(windows))]
pub const INCLUDE_DIR: &str = "include";

#[cfg(windows)]
pub const LIB_DIR: &str = "Lib";
#[cfg(not(windows))]
pub const LIB_DIR: &str = "lib";

pub const SITE_PACKAGES: &str = "site-packages";
pub const PYVENV_CFG: &str = "pyvenv.cfg";

pub fn bin_dir(venv: &Path) -> PathBuf {
    venv.join(BIN_DIR)
}

pub fn include_dir(venv: &Path) -> PathBuf {
    venv.join(INCLUDE_DIR)
}

/// Human readable form of the site-packages location, used in error messages.
pub fn lib_pattern() -> String {
    if cfg!(windows) {
        format!("{}\\{}", LIB_DIR, SITE_PACKAGES)
    } else {
        format!("{}/*/{}", LIB_DIR, SITE_PACKAGES)
    }
}

/// Site-packages directory for an interpreter of the given `major.minor` version.
pub fn site_packages_dir(venv: &Path, version: &str) -> PathBuf {
    if cfg!(windows) {
        venv.join(LIB_DIR).join(SITE_PACKAGES)
    } else {
        venv.join(LIB_DIR)
            .join(format!("python{}", version))
            .join(SITE_PACKAGES)
    }
}

pub fn executable_name(command: &str) -> String {
    if cfg!(windows) {
        format!("{}.exe", command)
    } else {
        command.to_string()
    }
}

pub fn python_path(venv: &Path) -> PathBuf {
    bin_dir(venv).join(executable_name("python"))
}

pub fn pip_path(venv: &Path) -> PathBuf {
    bin_dir(venv).join(executable_name("pip"))
}
