use crate::core::error::Result;
use directories::BaseDirs;
use std::collections::BTreeMap;
use std::path::PathBuf;

pub const TOOL_NAME: &str = "vsh";
pub const DEFAULT_SYSTEM_RC_DIR: &str = "/usr/local/etc/vsh";

/// Snapshot of the process environment taken once at startup.
///
/// Every operation reads its ambient settings from here. Child processes get a copy of
/// `vars` with their own overrides, prompt variables included; the parent's environment is
/// never modified.
#[derive(Debug, Clone)]
pub struct Environment {
    pub home: PathBuf,
    pub workon_home: PathBuf,
    pub shell: PathBuf,
    pub path: String,
    pub disable_prompt: bool,
    pub cwd: PathBuf,
    pub system_rc_dir: PathBuf,
    pub vars: BTreeMap<String, String>,
}

impl Environment {
    pub fn from_process() -> Result<Self> {
        let vars: BTreeMap<String, String> = std::env::vars().collect();
        let cwd = std::env::current_dir()?;
        Ok(Self::from_vars(vars, cwd))
    }

    pub fn from_vars(vars: BTreeMap<String, String>, cwd: PathBuf) -> Self {
        let non_empty = |key: &str| vars.get(key).filter(|v| !v.is_empty()).cloned();

        let home = non_empty("HOME")
            .map(PathBuf::from)
            .filter(|p| p.exists())
            .or_else(|| BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."));

        let workon_home = non_empty("WORKON_HOME")
            .map(PathBuf::from)
            .filter(|p| p.exists())
            .unwrap_or_else(|| home.join(".virtualenvs"));

        let shell = default_shell(non_empty("SHELL"));
        let path = non_empty("PATH").unwrap_or_default();
        let disable_prompt = non_empty("VIRTUAL_ENV_DISABLE_PROMPT").is_some();

        Self {
            home,
            workon_home,
            shell,
            path,
            disable_prompt,
            cwd,
            system_rc_dir: PathBuf::from(DEFAULT_SYSTEM_RC_DIR),
            vars,
        }
    }

    /// Directory holding one record file per named environment.
    pub fn config_dir(&self) -> PathBuf {
        self.home.join(format!(".{}", TOOL_NAME))
    }

    pub fn search_path(&self) -> Vec<PathBuf> {
        std::env::split_paths(&self.path).collect()
    }

    pub fn venv_home(&self, name: &str) -> PathBuf {
        self.workon_home.join(name)
    }
}

#[cfg(windows)]
fn default_shell(_configured: Option<String>) -> PathBuf {
    PathBuf::from("powershell.exe")
}

#[cfg(not(windows))]
fn default_shell(configured: Option<String>) -> PathBuf {
    configured
        .map(PathBuf::from)
        .filter(|p| p.exists())
        .unwrap_or_else(|| PathBuf::from("/bin/sh"))
}
