// src/generator.rs

use crate::cli::{Args, Backend};
use crate::emitter::Emitter;
use crate::error::Result;
use crate::model::{CommitRecord, Timestamp};
use crate::sampler;
use crate::schedule::Schedule;
use crate::vcs::{CliBackend, Git2Backend, VersionControl};
use indicatif::ProgressBar;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Log a progress line every this many commits
const PROGRESS_EVERY: usize = 50;

/// What a finished run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub commits: usize,
    pub first: Option<Timestamp>,
    pub last: Option<Timestamp>,
}

/// Samples timestamps, prepares the repository and writes the history
/// described by `args`.
pub fn run(args: &Args) -> Result<Summary> {
    let range = args.date_range()?;
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let timestamps = sampler::sample_timestamps(&mut rng, args.count, &range);
    tracing::info!(
        "Sampled {} timestamps between {} and {}",
        timestamps.len(),
        range.start(),
        range.end()
    );
    tracing::debug!("{} phase commits precede the template rotation", Schedule::phase_len());

    match args.backend {
        Backend::Libgit2 => generate_with(Git2Backend::new(&args.repo), args, &timestamps),
        Backend::Cli => generate_with(CliBackend::new(&args.repo), args, &timestamps),
    }
}

fn generate_with<V: VersionControl>(vcs: V, args: &Args, timestamps: &[Timestamp]) -> Result<Summary> {
    let mut emitter = Emitter::new(&args.repo, vcs);
    emitter.prepare(&args.identity())?;
    generate(&mut emitter, timestamps, args.count)
}

/// Emits one commit per timestamp, in order, pairing each with the next
/// [`Schedule`] entry. Stops after `min(target, timestamps.len())` commits.
///
/// The first failing commit aborts the run; commits already recorded stay.
pub fn generate<V: VersionControl>(
    emitter: &mut Emitter<V>,
    timestamps: &[Timestamp],
    target: usize,
) -> Result<Summary> {
    let total = target.min(timestamps.len());
    debug_assert!(timestamps.windows(2).all(|w| w[0] <= w[1]));

    let bar = ProgressBar::new(total as u64);
    bar.set_message("Creating commits");

    let mut created = 0;
    for (timestamp, plan) in timestamps.iter().zip(Schedule::new()).take(total) {
        let record = CommitRecord { timestamp: *timestamp, message: plan.message, files: plan.files };
        if let Err(e) = emitter.emit(&record) {
            bar.abandon_with_message("Aborted");
            tracing::error!("Commit {} ({:?}) failed after {} commits", created + 1, record.message, created);
            return Err(e);
        }

        created += 1;
        bar.inc(1);
        if created % PROGRESS_EVERY == 0 {
            tracing::info!("Created {created} commits...");
        }
    }
    bar.finish_with_message("History complete");

    let emitted = &timestamps[..created];
    Ok(Summary {
        commits: created,
        first: emitted.first().copied(),
        last: emitted.last().copied(),
    })
}
