use crate::config::env::Environment;
use crate::core::error::Result;
use crate::venv::interpreter;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Persisted metadata about one named virtual environment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct VenvRecord {
    pub venv_name: String,
    pub venv_path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_path: Option<PathBuf>,
    pub interpreter_path: PathBuf,
    pub shell_path: PathBuf,
    #[serde(default = "current_version")]
    pub vsh_version: String,
}

fn current_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

impl VenvRecord {
    /// Default record for an environment, using the configured shell and interpreter.
    pub fn new(name: &str, path: &Path, working: Option<&Path>, env: &Environment) -> Self {
        Self {
            venv_name: name.to_string(),
            venv_path: path.to_path_buf(),
            working_path: working.map(Path::to_path_buf),
            interpreter_path: interpreter::default_interpreter(env),
            shell_path: env.shell.clone(),
            vsh_version: current_version(),
        }
    }

    pub fn with_interpreter(mut self, interpreter: &Path) -> Self {
        self.interpreter_path = interpreter.to_path_buf();
        self
    }

    pub fn encode(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn decode(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Replaces path fields whose targets have disappeared with their defaults.
    pub fn normalized(mut self, env: &Environment) -> Self {
        if self.working_path.as_deref().is_some_and(|p| !p.exists()) {
            self.working_path = None;
        }
        if !self.shell_path.exists() {
            self.shell_path = env.shell.clone();
        }
        if !self.interpreter_path.exists() {
            self.interpreter_path = interpreter::default_interpreter(env);
        }
        self
    }
}
