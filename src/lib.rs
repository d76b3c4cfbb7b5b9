//! Season analytics for head-to-head fantasy leagues. Beyond the actual record, each team is
//! measured against every other team's score each week (the all-play record), and the gap between
//! the two is reported as luck. Weekly best and worst finishes and a naive projection of the
//! remaining season round out the summary.

pub mod all_play;
pub mod csv;
pub mod error;
pub mod file;
pub mod finishes;
pub mod integrity;
pub mod print;
pub mod record;
pub mod spotlight;
pub mod standings;
pub mod summary;
pub mod week;

#[cfg(test)]
pub(crate) mod testing;

#[doc = include_str!("../README.md")]
#[cfg(doc)]
fn readme() {}
