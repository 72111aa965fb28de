// ABOUTME: Command module aggregator for the buzzcraft-deploy CLI.
// ABOUTME: Re-exports deploy and init command handlers.

mod deploy;
mod init;
mod runtime_connection;

pub use deploy::{DeployArgs, deploy};
pub use init::init;
