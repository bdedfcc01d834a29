use anyhow::{Context, Result};
use clap::Parser;
use std::time::Instant;
use tracing::{error, info};

use domainsift::utils::{setup_logging, setup_workers};
use domainsift::{cli, report, Args, Session, Settings};

fn run(args: &Args, settings: &Settings) -> Result<()> {
    let start_time = Instant::now();

    let mut session = Session::load(settings.gateway(), settings.save_policy)
        .with_context(|| format!("Failed to load domains from {:?}", settings.store))?;

    let outcome = cli::execute(&mut session, &args.command, settings);
    report::print_notices(&session.take_notices());

    info!(
        action = "complete",
        component = "cli",
        duration_ms = start_time.elapsed().as_millis(),
        "Command finished"
    );
    outcome
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose);

    let settings = Settings::from_args(&args)?;
    setup_workers(settings.workers)?;
    info!(action = "configure", component = "cli", backend = ?settings.backend, store = ?settings.store, worker_count = settings.workers, "Settings resolved");

    match run(&args, &settings) {
        Ok(()) => Ok(()),
        Err(e) => {
            error!(action = "fail", component = "cli", error = %e, "Command failed");
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
