//! Past/upcoming splits over show lists.
//!
//! Both buckets use strict comparisons against `now`: a show starting exactly
//! at `now` is neither past nor upcoming.

use chrono::NaiveDateTime;

use crate::entities::show;

/// Display format for show start times in page payloads.
pub const START_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Anything carrying a show start time.
pub trait Scheduled {
    fn start_time(&self) -> NaiveDateTime;
}

impl Scheduled for show::Model {
    fn start_time(&self) -> NaiveDateTime {
        self.start_time
    }
}

impl<S: Scheduled> Scheduled for &S {
    fn start_time(&self) -> NaiveDateTime {
        (*self).start_time()
    }
}

pub fn count_upcoming<S: Scheduled>(shows: &[S], now: NaiveDateTime) -> usize {
    shows.iter().filter(|s| s.start_time() > now).count()
}

pub fn count_past<S: Scheduled>(shows: &[S], now: NaiveDateTime) -> usize {
    shows.iter().filter(|s| s.start_time() < now).count()
}

/// Partition into `(past, upcoming)`, keeping the input order in each half.
pub fn split_by_time<S: Scheduled>(shows: Vec<S>, now: NaiveDateTime) -> (Vec<S>, Vec<S>) {
    let mut past = Vec::new();
    let mut upcoming = Vec::new();
    for show in shows {
        let start = show.start_time();
        if start > now {
            upcoming.push(show);
        } else if start < now {
            past.push(show);
        }
    }
    (past, upcoming)
}

pub fn format_start_time(start_time: NaiveDateTime) -> String {
    start_time.format(START_TIME_FORMAT).to_string()
}
