//! Chalkboard CLI binary.
//!
//! This binary provides command-line access to each pipeline stage:
//! - Extract topics from a text file
//! - Plan and synthesize illustrations for a topic
//! - Direct, narrate and check a lesson

use chalkboard::{LogConfig, init_logging};
use clap::Parser;
use std::process::ExitCode;

mod cli;

#[tokio::main]
async fn main() -> ExitCode {
    use cli::{Cli, execute};

    // Parse command-line arguments
    let cli = Cli::parse();

    // Pick up provider keys from a local .env, if any
    dotenvy::dotenv().ok();

    let log_level = if cli.verbose { "debug" } else { "info" };
    if let Err(e) = init_logging(&LogConfig::new(log_level).with_json_logs(cli.log_json)) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    match execute(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(code = e.code(), error = %e, "Command failed");
            eprintln!("{}: {}", e.code(), e);
            ExitCode::FAILURE
        }
    }
}
