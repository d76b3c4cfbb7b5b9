//! Grouping of [MatchRow]s by week, and the [Roster] that fixes the iteration order of teams.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::record::MatchRow;

/// An inclusive range of weeks. A range whose start exceeds its end is empty rather than invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekRange {
    pub start: u32,
    pub end: u32,
}
impl WeekRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    pub fn contains(&self, week: u32) -> bool {
        self.start <= week && week <= self.end
    }

    pub fn len(&self) -> u32 {
        if self.is_empty() {
            0
        } else {
            self.end - self.start + 1
        }
    }
}

impl Display for WeekRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// All teams in the league, in the order they were first seen in the input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    teams: Vec<String>,
    indexes: FxHashMap<String, usize>,
}
impl Roster {
    pub fn from_rows(rows: &[MatchRow]) -> Self {
        let mut roster = Self::default();
        for row in rows {
            roster.insert(&row.team);
        }
        roster
    }

    pub fn insert(&mut self, team: &str) -> usize {
        if let Some(&index) = self.indexes.get(team) {
            return index;
        }
        let index = self.teams.len();
        self.teams.push(team.to_string());
        self.indexes.insert(team.to_string(), index);
        index
    }

    pub fn index_of(&self, team: &str) -> Option<usize> {
        self.indexes.get(team).copied()
    }

    pub fn teams(&self) -> &[String] {
        &self.teams
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.teams.iter().map(String::as_str)
    }
}

/// The rows of a single week, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekGroup<'a> {
    pub week: u32,
    pub rows: Vec<&'a MatchRow>,
}
impl<'a> WeekGroup<'a> {
    pub fn row(&self, team: &str) -> Option<&'a MatchRow> {
        self.rows.iter().find(|row| row.team == team).copied()
    }

    pub fn score(&self, team: &str) -> Option<f64> {
        self.row(team).and_then(|row| row.score)
    }

    /// `(team, score)` pairs of every team that scored this week.
    pub fn scored(&self) -> impl Iterator<Item = (&'a str, f64)> + '_ {
        self.rows
            .iter()
            .copied()
            .filter_map(|row: &'a MatchRow| row.score.map(|score| (row.team.as_str(), score)))
    }

    pub fn scores(&self) -> Vec<f64> {
        self.scored().map(|(_, score)| score).collect()
    }
}

/// Groups the rows falling within `range` by week number, in ascending week order.
pub fn group_weeks<'a>(rows: &'a [MatchRow], range: &WeekRange) -> Vec<WeekGroup<'a>> {
    if range.is_empty() {
        trace!("empty week range {range}");
        return vec![];
    }
    let mut by_week: BTreeMap<u32, Vec<&'a MatchRow>> = BTreeMap::new();
    for row in rows.iter().filter(|row| range.contains(row.week)) {
        by_week.entry(row.week).or_default().push(row);
    }
    by_week
        .into_iter()
        .map(|(week, rows)| WeekGroup { week, rows })
        .collect()
}

/// The latest completed week: the week preceding the earliest week in which no team has a non-zero
/// score. Returns 0 if the first week is yet to be played.
pub fn most_recent_week(rows: &[MatchRow]) -> u32 {
    let all = WeekRange::new(1, rows.iter().map(|row| row.week).max().unwrap_or(0));
    let mut latest = 0;
    for group in group_weeks(rows, &all) {
        let played = group.scored().any(|(_, score)| score != 0.0);
        if !played || group.week != latest + 1 {
            break;
        }
        latest = group.week;
    }
    latest
}

/// The weeks to summarise: from `start` to the most recent completed week, cut short by an
/// explicit `end_week` and by the regular `season_length`. Weeks past the regular season (playoffs,
/// consolation games) are thereby left out when a season length is given.
pub fn season_range(
    rows: &[MatchRow],
    start: u32,
    end_week: Option<u32>,
    season_length: Option<u32>,
) -> WeekRange {
    let end = [end_week, season_length]
        .into_iter()
        .flatten()
        .fold(most_recent_week(rows), u32::min);
    WeekRange::new(start, end)
}
