//! Testing helpers.

use assert_float_eq::*;

use crate::record::MatchRow;

/// Builds a league one week at a time, numbering weeks from 1 and emitting mirrored row pairs.
#[derive(Debug, Default)]
pub struct LeagueBuilder {
    rows: Vec<MatchRow>,
    weeks: u32,
}
impl LeagueBuilder {
    pub fn week(mut self, f: impl FnOnce(WeekBuilder) -> WeekBuilder) -> Self {
        self.weeks += 1;
        let week = f(WeekBuilder {
            week: self.weeks,
            rows: vec![],
        });
        self.rows.extend(week.rows);
        self
    }

    pub fn build(self) -> Vec<MatchRow> {
        self.rows
    }
}

#[derive(Debug)]
pub struct WeekBuilder {
    week: u32,
    rows: Vec<MatchRow>,
}
impl WeekBuilder {
    pub fn game(mut self, team: &str, score: f64, opponent: &str, opponent_score: f64) -> Self {
        let row = MatchRow::game(self.week, team, opponent, Some(score), Some(opponent_score));
        let mirror = row.mirrored().unwrap();
        self.rows.push(row);
        self.rows.push(mirror);
        self
    }

    pub fn unplayed(mut self, team: &str, opponent: &str) -> Self {
        let row = MatchRow::game(self.week, team, opponent, None, None);
        let mirror = row.mirrored().unwrap();
        self.rows.push(row);
        self.rows.push(mirror);
        self
    }

    pub fn bye(mut self, team: &str) -> Self {
        self.rows.push(MatchRow::bye(self.week, team));
        self
    }

    /// Appends a row verbatim, without its mirror.
    pub fn raw(mut self, row: MatchRow) -> Self {
        self.rows.push(MatchRow { week: self.week, ..row });
        self
    }
}

pub fn assert_f64_close(expected: f64, actual: f64) {
    if expected != actual {
        assert_float_absolute_eq!(expected, actual, 1e-9);
    }
}

pub fn assert_nan(actual: f64) {
    assert!(actual.is_nan(), "expected NaN, got {actual}");
}
