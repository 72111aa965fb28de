// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "buzzcraft-deploy")]
#[command(about = "Build and run BuzzCraft-generated Next.js sites as local containers")]
#[command(version)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Show build output and debug logs
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print only the final result
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Print JSON lines instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a generated project into an image and (re)start its container
    Deploy {
        /// Project directory containing package.json and buzzcraft.json
        path: PathBuf,

        /// Deploy to the local container runtime (the only supported target)
        #[arg(long)]
        local: bool,

        /// Host port to publish the site on (default 3000)
        #[arg(short, long)]
        port: Option<String>,

        /// Domain recorded for the deployment (default <projectId>.localhost)
        #[arg(short, long)]
        domain: Option<String>,
    },

    /// Write a buzzcraft.deploy.yml settings template
    Init {
        /// Project directory (default: current directory)
        dir: Option<PathBuf>,

        /// Overwrite an existing settings file
        #[arg(long)]
        force: bool,
    },
}
