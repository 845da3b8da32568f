// src/main.rs

mod cli;
mod emitter;
mod error;
mod generator;
mod logger;
mod model;
mod sampler;
mod schedule;
mod vcs;

use clap::Parser;
use cli::Args;
use std::time::Instant;

fn main() {
    let args = Args::parse();
    logger::init(args.verbose);
    let start_time = Instant::now();

    tracing::debug!("Arguments: {:?}", args);
    tracing::info!("Writing {} commits into {}", args.count, args.repo.display());

    match generator::run(&args) {
        Ok(summary) => {
            if let (Some(first), Some(last)) = (summary.first, summary.last) {
                tracing::info!("History spans from {} to {}.", first, last);
            }
            tracing::info!("Created {} commits in {:.2?}.", summary.commits, start_time.elapsed());
        }
        Err(e) => {
            tracing::error!("Backfill failed: {}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
