//! Error taxonomy of the season analytics core.
//!
//! [IntegrityError]s abort a computation outright; they point at the week and team where the
//! upstream row data stopped making sense. [ConfigError]s are precondition violations raised before
//! any aggregation is attempted.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("{0}")]
    Integrity(#[from] IntegrityError),

    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Lookup(#[from] LookupError),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntegrityError {
    #[error("week numbers are 1-indexed; found week 0 for team '{team}'")]
    InvalidWeek { team: String },

    #[error("weeks must be contiguous: expected week {expected}, found week {found}")]
    NonContiguousWeeks { expected: u32, found: u32 },

    #[error("empty team name in week {week}")]
    EmptyTeam { week: u32 },

    #[error("invalid score {score} for '{team}' in week {week}")]
    InvalidScore { week: u32, team: String, score: f64 },

    #[error("'{team}' has more than one row in week {week}")]
    DuplicateRow { week: u32, team: String },

    #[error("'{team}' is missing from week {week}")]
    MissingFromRoster { week: u32, team: String },

    #[error("week {week} has {rows} non-bye rows, which cannot pair up")]
    OddFixtureCount { week: u32, rows: usize },

    #[error("'{team}' is drawn against itself in week {week}")]
    SelfMatch { week: u32, team: String },

    #[error("'{team}' has a bye in week {week} but carries a score")]
    ScoredBye { week: u32, team: String },

    #[error("'{team}' has only one of score/opponent score in week {week}")]
    PartialResult { week: u32, team: String },

    #[error("'{team}' plays '{opponent}' in week {week}, but '{opponent}' has no mirrored row")]
    MissingMirror { week: u32, team: String, opponent: String },

    #[error("'{team}' vs '{opponent}' in week {week} does not mirror the opponent's row")]
    MismatchedMirror { week: u32, team: String, opponent: String },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("projections were requested but no season length was supplied")]
    MissingSeasonLength,

    #[error("season length must be at least one week")]
    ZeroSeasonLength,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LookupError {
    #[error("no team matches '{query}'")]
    UnknownTeam { query: String },

    #[error("'{query}' is ambiguous; candidates: {}", candidates.join(", "))]
    AmbiguousTeam { query: String, candidates: Vec<String> },
}
