// ABOUTME: Library root for buzzcraft-deploy - exposes the deployment engine.
// ABOUTME: The main binary is in main.rs.

pub mod build;
pub mod config;
pub mod deploy;
pub mod diagnostics;
pub mod error;
pub mod output;
pub mod project;
pub mod runtime;
pub mod types;
