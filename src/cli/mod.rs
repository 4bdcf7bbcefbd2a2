pub mod commands;

use crate::config::Environment;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "vsh",
    version,
    about = "A virtual environment shell: create, enter, list and remove Python virtual environments",
    long_about = None
)]
pub struct Cli {
    /// Do not create symlinks for python binaries during creation
    #[arg(short = 'c', long)]
    pub copy: bool,

    /// Create virtual environment, but do not enter
    #[arg(short = 'C', long)]
    pub create_only: bool,

    /// Do not make changes to the system
    #[arg(short = 'd', long)]
    pub dry_run: bool,

    /// Create, enter and remove on exit
    #[arg(short = 'e', long)]
    pub ephemeral: bool,

    /// Force removal options
    #[arg(short = 'f', long)]
    pub force: bool,

    /// Ask before changing the system
    #[arg(short = 'i', long)]
    pub interactive: bool,

    /// Show available virtual environments
    #[arg(short = 'l', long = "list")]
    pub list: bool,

    /// Print messages without color
    #[arg(short = 'm', long)]
    pub monochrome: bool,

    /// Do not include pip
    #[arg(long)]
    pub no_pip: bool,

    /// Overwrite existing virtual environment
    #[arg(short = 'o', long)]
    pub overwrite: bool,

    /// Path to virtual environment
    #[arg(long, value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Python version to use
    #[arg(short = 'p', long, value_name = "VERSION")]
    pub python: Option<String>,

    /// Remove virtual environment
    #[arg(short = 'r', long)]
    pub remove: bool,

    /// Give the environment access to the system site-packages
    #[arg(short = 's', long)]
    pub site_packages: bool,

    /// Upgrades to latest python version
    #[arg(short = 'u', long)]
    pub upgrade: bool,

    /// More output
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Default startup PATH when entering virtual environment
    #[arg(short = 'w', long, value_name = "PATH")]
    pub working: Option<PathBuf>,

    /// Ignore startup path when entering virtual environment and use the current directory
    #[arg(short = 'W', long)]
    pub ignore_working: bool,

    /// Name of the virtual environment
    #[arg(value_name = "VENV_NAME")]
    pub name: Option<String>,

    /// Command to run inside the environment (default: your shell)
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

/// Runs the parsed command line and returns the process exit code.
pub async fn run(cli: Cli) -> crate::core::error::Result<i32> {
    if cli.monochrome {
        colored::control::set_override(false);
    }

    let env = Environment::from_process()?;

    if cli.list {
        commands::list::execute(&env, cli.path.as_deref()).await?;
        return Ok(0);
    }

    commands::venv::execute(&env, cli).await
}
