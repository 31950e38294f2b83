use std::io;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use submit_slurm::cli::{cli_to_config, Cli};
use submit_slurm::core::error::SubmitError;
use submit_slurm::core::scheduler::{Environment, SbatchCli};
use submit_slurm::core::Submitter;

fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter())))
        .init();

    if let Err(err) = run(cli) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), SubmitError> {
    debug!(?cli, "parsed arguments");

    let submission_dir = std::env::current_dir().map_err(SubmitError::SubmissionDir)?;
    let config = cli_to_config(cli, submission_dir, Environment::capture());

    let submitter = Submitter::new(config, SbatchCli::default());
    let mut stdout = io::stdout().lock();
    submitter.run(&mut stdout)?;

    Ok(())
}
