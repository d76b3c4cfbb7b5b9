//! Integrity checks over the raw [MatchRow]s. Every aggregate downstream assumes one row per team
//! per week and mirrored game rows; these checks make sure that holds before anything is summed.

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::IntegrityError;
use crate::record::{MatchRow, Opponent};
use crate::week::{group_weeks, Roster, WeekGroup, WeekRange};

/// Validates `rows` in full for well-formedness and week contiguity, and validates the weeks
/// within `range` for roster completeness and mirror symmetry. Stops at the first violation.
pub fn validate(rows: &[MatchRow], roster: &Roster, range: &WeekRange) -> Result<(), IntegrityError> {
    for row in rows {
        validate_row(row)?;
    }
    validate_contiguous(rows)?;
    for group in group_weeks(rows, range) {
        validate_week(&group, roster)?;
    }
    debug!("validated {} rows over weeks {range}", rows.len());
    Ok(())
}

fn validate_row(row: &MatchRow) -> Result<(), IntegrityError> {
    if row.week == 0 {
        return Err(IntegrityError::InvalidWeek {
            team: row.team.clone(),
        });
    }
    if row.team.trim().is_empty() {
        return Err(IntegrityError::EmptyTeam { week: row.week });
    }
    for score in [row.score, row.opponent_score].into_iter().flatten() {
        if !score.is_finite() || score < 0.0 {
            return Err(IntegrityError::InvalidScore {
                week: row.week,
                team: row.team.clone(),
                score,
            });
        }
    }
    Ok(())
}

fn validate_contiguous(rows: &[MatchRow]) -> Result<(), IntegrityError> {
    let weeks: BTreeSet<u32> = rows.iter().map(|row| row.week).collect();
    for (expected, found) in (1..).zip(weeks) {
        if expected != found {
            return Err(IntegrityError::NonContiguousWeeks { expected, found });
        }
    }
    Ok(())
}

pub(crate) fn validate_week(group: &WeekGroup, roster: &Roster) -> Result<(), IntegrityError> {
    let week = group.week;
    let mut by_team: FxHashMap<&str, &MatchRow> = FxHashMap::default();
    for &row in &group.rows {
        if by_team.insert(&row.team, row).is_some() {
            return Err(IntegrityError::DuplicateRow {
                week,
                team: row.team.clone(),
            });
        }
    }

    if let Some(team) = roster.iter().find(|team| !by_team.contains_key(team)) {
        return Err(IntegrityError::MissingFromRoster {
            week,
            team: team.to_string(),
        });
    }

    let fixture_rows = group.rows.iter().filter(|row| !row.is_bye()).count();
    if fixture_rows % 2 != 0 {
        return Err(IntegrityError::OddFixtureCount {
            week,
            rows: fixture_rows,
        });
    }

    for &row in &group.rows {
        match &row.opponent {
            Opponent::Bye => {
                if row.score.is_some() || row.opponent_score.is_some() {
                    return Err(IntegrityError::ScoredBye {
                        week,
                        team: row.team.clone(),
                    });
                }
            }
            Opponent::Team(opponent) => {
                if *opponent == row.team {
                    return Err(IntegrityError::SelfMatch {
                        week,
                        team: row.team.clone(),
                    });
                }
                if row.score.is_some() != row.opponent_score.is_some() {
                    return Err(IntegrityError::PartialResult {
                        week,
                        team: row.team.clone(),
                    });
                }
                let Some(&mirror) = by_team.get(opponent.as_str()) else {
                    return Err(IntegrityError::MissingMirror {
                        week,
                        team: row.team.clone(),
                        opponent: opponent.clone(),
                    });
                };
                if Some(mirror) != row.mirrored().as_ref() {
                    return Err(IntegrityError::MismatchedMirror {
                        week,
                        team: row.team.clone(),
                        opponent: opponent.clone(),
                    });
                }
            }
        }
    }
    Ok(())
}
