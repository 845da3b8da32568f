// src/sampler.rs

use crate::model::{DateRange, Timestamp};
use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Weekday};
use rand::Rng;

/// Probability that a sampled weekend date survives a single draw
pub const WEEKEND_KEEP_PROBABILITY: f64 = 0.3;

/// Working hours are drawn from `[WORKDAY_START_HOUR, WORKDAY_END_HOUR)`
pub const WORKDAY_START_HOUR: u32 = 9;
pub const WORKDAY_END_HOUR: u32 = 18;

/// Draws `count` timestamps from `range` and returns them in ascending order.
///
/// Each timestamp is a uniform day in the range plus a uniform working-hour
/// time. Weekend days go through a rejection loop: while the day is a
/// Saturday or Sunday and a fresh draw exceeds [`WEEKEND_KEEP_PROBABILITY`],
/// the day is drawn again. Identical timestamps are allowed.
pub fn sample_timestamps<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    range: &DateRange,
) -> Vec<Timestamp> {
    let mut timestamps: Vec<Timestamp> = (0..count)
        .map(|_| {
            let date = sample_date(rng, range);
            let hour = rng.gen_range(WORKDAY_START_HOUR..WORKDAY_END_HOUR);
            let minute = rng.gen_range(0..60);
            // hour < 24 and minute < 60, so this never falls back
            let time = NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default();
            date.and_time(time)
        })
        .collect();

    timestamps.sort();
    timestamps
}

fn sample_date<R: Rng + ?Sized>(rng: &mut R, range: &DateRange) -> NaiveDate {
    let span = range.span_days();
    let mut date = range.start() + Duration::days(rng.gen_range(0..=span));
    while is_weekend(date) && rng.gen::<f64>() > WEEKEND_KEEP_PROBABILITY {
        date = range.start() + Duration::days(rng.gen_range(0..=span));
    }
    date
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}
