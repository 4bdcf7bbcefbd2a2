use crate::config::env::Environment;
use crate::config::record::VenvRecord;
use crate::config::store::RecordStore;
use crate::core::error::{Result, VshError};
use crate::core::path::absolutize;
use crate::shell::enter::{self, EnterOptions};
use crate::shell::rcfiles::build_vsh_rc_file;
use crate::venv::builder::{BuildOptions, VenvBuilder};
use crate::venv::discovery::find_environment_folders;
use crate::venv::{interpreter, validator};
use colored::Colorize;
use dialoguer::Confirm;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct CreateOptions {
    pub build: BuildOptions,
    /// Interpreter version, name or path; the default interpreter when unset.
    pub python: Option<String>,
    pub working: Option<PathBuf>,
    pub interactive: bool,
    pub dry_run: bool,
}

#[derive(Debug, Clone, Default)]
pub struct RemoveOptions {
    pub interactive: bool,
    pub dry_run: bool,
    pub check: bool,
}

/// Lifecycle operations on environments: create, upgrade, enter, remove and list.
pub struct VenvManager<'a> {
    env: &'a Environment,
    store: RecordStore,
}

impl<'a> VenvManager<'a> {
    pub fn new(env: &'a Environment) -> Self {
        Self {
            env,
            store: RecordStore::new(env),
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    fn absolute(&self, path: &Path) -> PathBuf {
        absolutize(path, &self.env.home, &self.env.cwd)
    }

    pub async fn create(&self, path: &Path, options: &CreateOptions) -> Result<PathBuf> {
        let path = self.absolute(path);
        let name = venv_name(&path)?;

        let question = format!(
            "Create virtual environment \"{}\" under: {}?",
            name.yellow(),
            path.display().to_string().green()
        );
        if !confirm(options.interactive, &question)? {
            return Ok(path);
        }

        if options.dry_run {
            tracing::info!("Would create virtual environment \"{}\" under: {}", name, path.display());
            return Ok(path);
        }

        let interpreter = interpreter::resolve(options.python.as_deref(), self.env)?;
        let builder = VenvBuilder::new(options.build.clone());
        builder.create(&path, &interpreter).await?;

        let working = options.working.as_deref().map(|w| self.absolute(w));
        self.create_record(&name, &path, working.as_deref(), &interpreter)
            .await?;
        build_vsh_rc_file(&path, working.as_deref().unwrap_or(self.env.cwd.as_path())).await?;

        tracing::info!(
            "Created virtual environment \"{}\" under: {}",
            name.yellow(),
            path.display().to_string().green()
        );
        Ok(path)
    }

    /// Rebuilds an existing environment in place against the requested interpreter.
    pub async fn upgrade(&self, path: &Path, options: &CreateOptions) -> Result<PathBuf> {
        let mut options = options.clone();
        options.build.upgrade = true;
        self.create(path, &options).await
    }

    pub async fn create_record(
        &self,
        name: &str,
        path: &Path,
        working: Option<&Path>,
        interpreter: &Path,
    ) -> Result<VenvRecord> {
        let record = VenvRecord::new(name, path, working, self.env).with_interpreter(interpreter);
        self.store.save(&record).await?;
        Ok(record)
    }

    pub async fn enter(
        &self,
        path: &Path,
        command: &[String],
        options: &EnterOptions,
    ) -> Result<i32> {
        enter::enter(self.env, &self.store, path, command, options).await
    }

    /// Deletes the environment tree and its record.
    ///
    /// Without `check` a missing path is a silent no-op.
    pub async fn remove(&self, path: &Path, options: &RemoveOptions) -> Result<PathBuf> {
        let path = self.absolute(path);
        validator::validate_environment(&path, options.check)?;

        let question = format!("Remove {}?", path.display().to_string().yellow());
        if !confirm(options.interactive, &question)? {
            return Ok(path);
        }

        if options.dry_run {
            tracing::info!("Would remove {}", path.display());
            return Ok(path);
        }

        if path.exists() {
            tokio::fs::remove_dir_all(&path).await?;
            if let Ok(name) = venv_name(&path) {
                self.store.remove(&name).await?;
            }
        } else if options.check {
            return Err(VshError::PathNotFound { path });
        }

        tracing::info!("{}: {}", "Removed".cyan(), path.display().to_string().green());
        Ok(path)
    }

    /// Environments under `root` (the environments home by default), sorted by name.
    pub fn list(&self, root: Option<&Path>) -> Vec<(String, PathBuf)> {
        let root = root
            .map(|r| self.absolute(r))
            .unwrap_or_else(|| self.env.workon_home.clone());
        let mut found: Vec<(String, PathBuf)> = find_environment_folders(&root).collect();
        found.sort();
        found
    }
}

fn venv_name(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| VshError::VenvNameError {
            name: path.display().to_string(),
        })
}

fn confirm(interactive: bool, question: &str) -> Result<bool> {
    if !interactive {
        return Ok(true);
    }
    Ok(Confirm::new().with_prompt(question).interact()?)
}
