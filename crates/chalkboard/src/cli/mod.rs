//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the chalkboard binary.

mod commands;
mod output;
mod run;

pub use commands::{Cli, Commands};
pub use run::execute;
