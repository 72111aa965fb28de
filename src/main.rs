// ABOUTME: Entry point for the buzzcraft-deploy CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use buzzcraft_deploy::error::Result;
use buzzcraft_deploy::output::{Output, OutputMode};
use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // Help and version go to stdout and succeed; usage errors exit 1.
            std::process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("buzzcraft_deploy=debug,warn")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };
    let mut output = Output::new(mode, cli.verbose);

    if let Err(e) = run(cli.command, &mut output).await {
        output.error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(command: Commands, output: &mut Output) -> Result<()> {
    match command {
        Commands::Deploy {
            path,
            local,
            port,
            domain,
        } => {
            commands::deploy(
                commands::DeployArgs {
                    path,
                    local,
                    port,
                    domain,
                },
                output,
            )
            .await
        }
        Commands::Init { dir, force } => commands::init(dir, force, output),
    }
}
