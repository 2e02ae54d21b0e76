// src/cli.rs
use anyhow::Result;
use clap::{Arg, ArgAction, Command};
use std::path::PathBuf;

use crate::commands::{self, run::RunOptions};

fn build_cli() -> Command {
    Command::new("baseline-runner")
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .about(
            "Runs a test suite across an environment matrix, separates visual-regression \
             tests from standard tests, regenerates image baselines on visual failure, \
             and archives them per matrix cell.",
        )
        .subcommand(
            Command::new("run")
                .about("Orchestrate every matrix cell and report the results.")
                .arg(
                    Arg::new("jobs")
                        .short('j')
                        .long("jobs")
                        .help("Number of matrix cells to orchestrate in parallel.")
                        .value_name("JOBS")
                        .value_parser(clap::value_parser!(usize))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .help("Path to the matrix configuration file.")
                        .value_name("CONFIG")
                        .default_value("BaselineMatrix.toml")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("project-dir")
                        .long("project-dir")
                        .help("Root directory of the project under test.")
                        .value_name("PROJECT_DIR")
                        .default_value(".")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("os")
                        .long("os")
                        .help("Restrict the run to one OS identifier from the matrix.")
                        .value_name("OS_ID")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("runtime")
                        .long("runtime")
                        .help("Restrict the run to one runtime version from the matrix.")
                        .value_name("RUNTIME")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("deadline-secs")
                        .long("deadline-secs")
                        .help(
                            "Wall-clock budget in seconds; in-flight cells are cancelled \
                             when it elapses, but their archive step is still attempted.",
                        )
                        .value_name("SECONDS")
                        .value_parser(clap::value_parser!(u64))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("html")
                        .long("html")
                        .help("Write an HTML report to the given path.")
                        .value_name("HTML")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Write a machine-readable JSON report to the given path.")
                        .value_name("JSON")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                ),
        )
        .subcommand(
            Command::new("init")
                .about("Create a BaselineMatrix.toml configuration file.")
                .arg(
                    Arg::new("non-interactive")
                        .long("non-interactive")
                        .help("Create a default config file without launching the interactive wizard.")
                        .action(ArgAction::SetTrue),
                ),
        )
}

pub async fn run() -> Result<()> {
    let matches = build_cli().get_matches();

    match matches.subcommand() {
        Some(("run", run_matches)) => {
            let options = RunOptions {
                jobs: run_matches.get_one::<usize>("jobs").copied(),
                config: run_matches
                    .get_one::<PathBuf>("config")
                    .unwrap() // Has default
                    .clone(),
                project_dir: run_matches
                    .get_one::<PathBuf>("project-dir")
                    .unwrap() // Has default
                    .clone(),
                os: run_matches.get_one::<String>("os").cloned(),
                runtime: run_matches.get_one::<String>("runtime").cloned(),
                deadline_secs: run_matches.get_one::<u64>("deadline-secs").copied(),
                html: run_matches.get_one::<PathBuf>("html").cloned(),
                json: run_matches.get_one::<PathBuf>("json").cloned(),
            };
            commands::run::execute(options).await?;
        }
        Some(("init", init_matches)) => {
            let non_interactive = init_matches.get_flag("non-interactive");
            commands::init::run_init_wizard(non_interactive)?;
        }
        _ => {
            // This case handles when no subcommand is given.
            // Clap will have already printed help info.
        }
    }
    Ok(())
}
