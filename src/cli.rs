// src/cli.rs

use crate::error::Result;
use crate::model::{DateRange, Identity};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory of the repository to create or extend
    #[arg(short, long, default_value = ".")]
    pub repo: PathBuf,

    /// Number of commits to create
    #[arg(short = 'n', long, default_value_t = 624)]
    pub count: usize,

    /// Calendar year the commits are spread across
    #[arg(short, long, default_value_t = 2021)]
    pub year: i32,

    /// First day of the range (YYYY-MM-DD), overrides the start of --year
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Last day of the range (YYYY-MM-DD), overrides the end of --year
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Seed for the timestamp sampler, for reproducible histories
    #[arg(long)]
    pub seed: Option<u64>,

    /// How commits are written
    #[arg(long, value_enum, default_value_t = Backend::Libgit2)]
    pub backend: Backend,

    /// Author and committer name
    #[arg(long, default_value = "DevOps Learner")]
    pub author_name: String,

    /// Author and committer email
    #[arg(long, default_value = "devops@example.com")]
    pub author_email: String,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(clap::ValueEnum, Clone, Debug, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Write objects in-process through libgit2
    Libgit2,
    /// Invoke the `git` executable for every operation
    Cli,
}

impl Args {
    pub fn date_range(&self) -> Result<DateRange> {
        let year = DateRange::year(self.year)?;
        DateRange::new(self.start.unwrap_or(year.start()), self.end.unwrap_or(year.end()))
    }

    pub fn identity(&self) -> Identity {
        Identity { name: self.author_name.clone(), email: self.author_email.clone() }
    }
}
