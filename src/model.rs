// src/model.rs

use crate::error::{BackfillError, Result};
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// A commit date, always recorded with a `+0000` offset
pub type Timestamp = NaiveDateTime;

/// Relative file path -> full file content
pub type FileSet = BTreeMap<PathBuf, String>;

/// Inclusive calendar range that timestamps are drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(BackfillError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Jan 1 through Dec 31 of `year`.
    pub fn year(year: i32) -> Result<Self> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1);
        let end = NaiveDate::from_ymd_opt(year, 12, 31);
        match start.zip(end) {
            Some((start, end)) => Self::new(start, end),
            None => Err(BackfillError::InvalidYear(year)),
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days between start and end; 0 for a single-day range.
    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Author and committer identity stored in the repository config
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

/// One emitted commit: when, why, and which files it writes
#[derive(Debug, Clone)]
pub struct CommitRecord {
    pub timestamp: Timestamp,
    pub message: String,
    pub files: FileSet,
}
