use crate::core::error::{Result, VshError};
use crate::core::{clear_directory, ensure_dir_exists, is_dir_empty, symlink_dir, ProcessExecutor};
use crate::venv::interpreter::interpreter_version;
use crate::venv::layout::{self, PYVENV_CFG};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs;

const SITE_PACKAGES_KEY: &str = "include-system-site-packages";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    pub system_site_packages: bool,
    pub overwrite: bool,
    pub symlinks: bool,
    pub upgrade: bool,
    pub include_pip: bool,
    pub prompt: Option<String>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            system_site_packages: false,
            overwrite: false,
            symlinks: true,
            upgrade: false,
            include_pip: true,
            prompt: None,
        }
    }
}

/// Drives the interpreter's stock `venv` module.
///
/// The directory skeleton is laid out here, the stock builder fills in the interpreter and
/// activation scripts, and pip is bootstrapped with the environment's own interpreter.
/// System site packages stay disabled until pip is in place so the bootstrap can't pick up
/// a system-wide pip.
pub struct VenvBuilder {
    options: BuildOptions,
}

impl VenvBuilder {
    pub fn new(options: BuildOptions) -> Self {
        Self { options }
    }

    pub async fn create(&self, env_dir: &Path, interpreter: &Path) -> Result<PathBuf> {
        let version = interpreter_version(interpreter).await?;
        tracing::debug!(
            "Building {} with {} (python {})",
            env_dir.display(),
            interpreter.display(),
            version
        );

        self.ensure_directories(env_dir, &version).await?;
        self.setup_python(env_dir, interpreter).await?;

        if self.options.include_pip {
            self.setup_pip(env_dir).await?;
        }

        if self.options.system_site_packages {
            write_site_packages_flag(&env_dir.join(PYVENV_CFG), true).await?;
        }

        Ok(env_dir.to_path_buf())
    }

    async fn ensure_directories(&self, env_dir: &Path, version: &str) -> Result<()> {
        if env_dir.exists() {
            if !env_dir.is_dir() {
                return Err(VshError::AlreadyExists {
                    path: env_dir.to_path_buf(),
                });
            }
            if self.options.overwrite {
                tracing::debug!("Clearing {}", env_dir.display());
                clear_directory(env_dir).await?;
            } else if !self.options.upgrade && !is_dir_empty(env_dir).await? {
                return Err(VshError::AlreadyExists {
                    path: env_dir.to_path_buf(),
                });
            }
        }

        ensure_dir_exists(env_dir).await?;
        ensure_dir_exists(&layout::include_dir(env_dir)).await?;
        ensure_dir_exists(&layout::site_packages_dir(env_dir, version)).await?;

        if needs_lib64_link() {
            let link = env_dir.join("lib64");
            if fs::symlink_metadata(&link).await.is_err() {
                symlink_dir(Path::new(layout::LIB_DIR), &link).await?;
            }
        }

        ensure_dir_exists(&layout::bin_dir(env_dir)).await?;
        Ok(())
    }

    async fn setup_python(&self, env_dir: &Path, interpreter: &Path) -> Result<()> {
        let args = self.venv_args(env_dir);
        tracing::debug!("Running {} {:?}", interpreter.display(), args);
        ProcessExecutor::execute_build_step(interpreter, &args).await
    }

    fn venv_args(&self, env_dir: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-m".into(), "venv".into(), "--without-pip".into()];

        if self.options.symlinks {
            args.push("--symlinks".into());
        } else {
            args.push("--copies".into());
        }

        if self.options.upgrade {
            args.push("--upgrade".into());
        }

        let prompt = self
            .options
            .prompt
            .clone()
            .or_else(|| env_dir.file_name().map(|n| n.to_string_lossy().to_string()));
        if let Some(prompt) = prompt {
            args.push("--prompt".into());
            args.push(prompt.into());
        }

        args.push(env_dir.as_os_str().to_os_string());
        args
    }

    async fn setup_pip(&self, env_dir: &Path) -> Result<()> {
        let python = layout::python_path(env_dir);
        if !python.exists() {
            return Err(VshError::BuildFailed(format!(
                "Cannot install pip, {} is missing",
                python.display()
            )));
        }

        tracing::debug!("Bootstrapping pip with {}", python.display());
        ProcessExecutor::execute_build_step(
            &python,
            &["-Esm", "ensurepip", "--upgrade", "--default-pip"],
        )
        .await
    }
}

fn needs_lib64_link() -> bool {
    cfg!(all(
        unix,
        target_pointer_width = "64",
        not(target_os = "macos")
    ))
}

async fn write_site_packages_flag(cfg_path: &Path, enabled: bool) -> Result<()> {
    let content = fs::read_to_string(cfg_path).await?;
    fs::write(cfg_path, set_site_packages_flag(&content, enabled)).await?;
    Ok(())
}

fn set_site_packages_flag(content: &str, enabled: bool) -> String {
    let line = format!("{} = {}", SITE_PACKAGES_KEY, enabled);
    let mut found = false;
    let mut lines: Vec<String> = content
        .lines()
        .map(|l| {
            let key = l.split('=').next().unwrap_or_default().trim();
            if key == SITE_PACKAGES_KEY {
                found = true;
                line.clone()
            } else {
                l.to_string()
            }
        })
        .collect();

    if !found {
        lines.push(line);
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
