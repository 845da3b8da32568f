// src/error.rs

use chrono::NaiveDate;
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackfillError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("`git {command}` exited with {status}: {stderr}")]
    GitCommand {
        command: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("repository at {0} has not been initialized")]
    NotInitialized(PathBuf),

    #[error("invalid file path `{0}`: must be relative and stay inside the repository")]
    InvalidPath(PathBuf),

    #[error("invalid date range: {start} is after {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("year {0} is outside the supported calendar")]
    InvalidYear(i32),
}

pub type Result<T> = std::result::Result<T, BackfillError>;
