use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VshError {
    #[error("Could not find interpreter for: {version}")]
    InterpreterNotFound { version: String },

    #[error("Path is not a valid environment: {path} ({reason})")]
    InvalidEnvironment { path: PathBuf, reason: String },

    #[error("Could not find path: {path}")]
    PathNotFound { path: PathBuf },

    #[error("Could not find virtual environment named: {name}")]
    VenvNameError { name: String },

    #[error("Could not find venv: {name}")]
    VenvConfigNotFound { name: String },

    #[error("Directory {path} already exists and is not empty. Use --overwrite to replace it")]
    AlreadyExists { path: PathBuf },

    #[error("Invalid virtual environment name: {0}")]
    InvalidName(String),

    #[error("Virtual environment build failed: {0}")]
    BuildFailed(String),

    #[error("Command execution failed: {0}")]
    CommandFailed(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    TomlSerialize(#[from] toml::ser::Error),

    #[error(transparent)]
    Dialog(#[from] dialoguer::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl VshError {
    pub fn invalid_environment(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidEnvironment {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, VshError>;
