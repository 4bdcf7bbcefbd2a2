use crate::cli::Cli;
use crate::config::{validate_venv_name_and_path, Environment};
use crate::core::error::{Result, VshError};
use crate::shell::EnterOptions;
use crate::venv::{is_valid, BuildOptions, CreateOptions, RemoveOptions, VenvManager};
use clap::CommandFactory;
use colored::Colorize;

/// Create, upgrade, enter and/or remove the environment named on the command line.
pub async fn execute(env: &Environment, mut cli: Cli) -> Result<i32> {
    // with an explicit path the first positional starts the command
    if cli.path.is_some() {
        if let Some(first) = cli.name.take() {
            cli.command.insert(0, first);
        }
    }

    let (name, path) =
        match validate_venv_name_and_path(cli.name.as_deref(), cli.path.as_deref(), env) {
            Ok(resolved) => resolved,
            Err(VshError::VenvNameError { .. }) => {
                Cli::command().print_help()?;
                eprintln!(
                    "\n{}: Missing {} or {}.\n",
                    "Error".red(),
                    "name".cyan(),
                    "path".cyan()
                );
                return Ok(1);
            }
            Err(e) => return Err(e),
        };

    let manager = VenvManager::new(env);
    let exists = is_valid(&path);
    let mut remove = cli.remove;

    // without a command the user's shell is started, unless we are only removing
    let wants_enter = !cli.command.is_empty() || !remove;

    let create_options = CreateOptions {
        build: BuildOptions {
            system_site_packages: cli.site_packages,
            overwrite: cli.overwrite,
            symlinks: !cli.copy,
            upgrade: false,
            include_pip: !cli.no_pip,
            prompt: None,
        },
        python: cli.python.clone(),
        working: cli.working.clone(),
        interactive: cli.interactive,
        dry_run: cli.dry_run,
    };

    if exists && cli.upgrade {
        manager.upgrade(&path, &create_options).await?;
    } else if !exists && !remove {
        manager.create(&path, &create_options).await?;
        if cli.ephemeral {
            remove = true;
        }
    }
    if cli.ephemeral && cli.force {
        remove = true;
    }

    let mut return_code = 0;
    if wants_enter && !cli.create_only {
        if cli.dry_run {
            tracing::info!("Would enter {} under {}", name, path.display());
        } else {
            let options = EnterOptions {
                working: cli.working.clone(),
                ignore_working: cli.ignore_working,
                interactive: None,
            };
            return_code = manager.enter(&path, &cli.command, &options).await?;
        }
    }

    if cli.ephemeral && !remove {
        println!();
        println!(
            "{}",
            "WARNING: Ephemeral option ignored. Aborting removal.".yellow()
        );
        println!();
        println!("Virtual environment '{}' existed previously.", name.green());
        println!("To remove, run:");
        println!();
        println!("    {}", format!("vsh -r {}", name).cyan());
        println!();
    }

    if remove {
        let options = RemoveOptions {
            interactive: cli.interactive,
            dry_run: cli.dry_run,
            check: false,
        };
        manager.remove(&path, &options).await?;
    }

    Ok(return_code)
}
