//! Subcommand implementations for the `baseline-runner` CLI.

pub mod init;
pub mod run;
