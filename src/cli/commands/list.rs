use crate::config::Environment;
use crate::core::error::Result;
use crate::venv::VenvManager;
use colored::Colorize;
use std::path::Path;
use std::time::Instant;

pub async fn execute(env: &Environment, root: Option<&Path>) -> Result<()> {
    let started = Instant::now();
    let manager = VenvManager::new(env);
    let venvs = manager.list(root);

    for (name, path) in &venvs {
        println!(
            "Found {} under: {}",
            name.yellow(),
            path.display().to_string().yellow()
        );
    }

    tracing::info!("Found {} venvs in {:.3?}", venvs.len(), started.elapsed());
    Ok(())
}
