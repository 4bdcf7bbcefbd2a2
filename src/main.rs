use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{fmt, EnvFilter};
use vsh::cli::{run, Cli};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse CLI
    let cli = Cli::parse();

    // Initialize logging; every -v raises the level
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    // Run command
    match run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    }
}
