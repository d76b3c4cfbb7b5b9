//! The record aggregator: actual win/tie/loss records and points, combined with all-play totals.

use tracing::debug;

use crate::all_play::{week_credits, AllPlayTally};
use crate::record::Outcome;
use crate::week::{Roster, WeekGroup};

#[derive(Debug, Clone, PartialEq)]
pub struct TeamRecord {
    pub team: String,
    pub wins: u32,
    pub ties: u32,
    pub losses: u32,
    /// Weeks in which the team has a score.
    pub games_played: u32,
    pub points_for: f64,
    pub points_against: f64,
    pub max_score: Option<f64>,
    pub min_score: Option<f64>,
    pub all_play: AllPlayTally,
}
impl TeamRecord {
    pub fn new(team: impl Into<String>) -> Self {
        Self {
            team: team.into(),
            wins: 0,
            ties: 0,
            losses: 0,
            games_played: 0,
            points_for: 0.0,
            points_against: 0.0,
            max_score: None,
            min_score: None,
            all_play: AllPlayTally::default(),
        }
    }

    pub fn actual_win_equivalent(&self) -> f64 {
        self.wins as f64 + 0.5 * self.ties as f64
    }

    /// NaN when no games have been played.
    pub fn win_pct(&self) -> f64 {
        if self.games_played == 0 {
            f64::NAN
        } else {
            self.actual_win_equivalent() / self.games_played as f64
        }
    }

    pub fn luck(&self) -> f64 {
        self.actual_win_equivalent() - self.all_play.expected_wins
    }

    fn record_outcome(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Tie => self.ties += 1,
            Outcome::Loss => self.losses += 1,
        }
        self.games_played += 1;
    }

    fn record_score(&mut self, score: f64) {
        self.max_score = Some(self.max_score.map_or(score, |max| f64::max(max, score)));
        self.min_score = Some(self.min_score.map_or(score, |min| f64::min(min, score)));
    }

    /// Folds another record of the same team (e.g., a different season or week range) into this one.
    pub fn merge(&mut self, other: &TeamRecord) {
        self.wins += other.wins;
        self.ties += other.ties;
        self.losses += other.losses;
        self.games_played += other.games_played;
        self.points_for += other.points_for;
        self.points_against += other.points_against;
        if let Some(max) = other.max_score {
            self.record_score(max);
        }
        if let Some(min) = other.min_score {
            self.record_score(min);
        }
        self.all_play.merge(&other.all_play);
    }
}

/// Aggregates records for every team on the `roster`, in roster order. Teams that did not play in
/// any of the `groups` are still present, with zeroed records.
pub fn aggregate(roster: &Roster, groups: &[WeekGroup]) -> Vec<TeamRecord> {
    let mut records: Vec<_> = roster.iter().map(TeamRecord::new).collect();
    for group in groups {
        for row in &group.rows {
            let Some(index) = roster.index_of(&row.team) else {
                debug!("skipping '{}' in week {}: not on the roster", row.team, group.week);
                continue;
            };
            let record = &mut records[index];
            if let (Some(score), Some(outcome)) = (row.score, row.outcome()) {
                record.record_outcome(outcome);
                record.record_score(score);
                record.points_for += score;
            }
            if let Some(opponent_score) = row.opponent_score {
                record.points_against += opponent_score;
            }
        }

        for credit in week_credits(group) {
            if let Some(index) = roster.index_of(&credit.team) {
                records[index].all_play.add(&credit);
            }
        }
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{assert_f64_close, assert_nan, LeagueBuilder};
    use crate::week::{group_weeks, WeekRange};

    fn record_of<'a>(records: &'a [TeamRecord], team: &str) -> &'a TeamRecord {
        records.iter().find(|record| record.team == team).unwrap()
    }

    #[test]
    fn records_and_points() {
        let rows = LeagueBuilder::default()
            .week(|w| w.game("a", 100.0, "b", 90.0).game("c", 80.0, "d", 80.0))
            .week(|w| w.game("a", 70.0, "c", 110.0).game("b", 95.0, "d", 60.0))
            .build();
        let roster = Roster::from_rows(&rows);
        let records = aggregate(&roster, &group_weeks(&rows, &WeekRange::new(1, 2)));
        assert_eq!(
            vec!["a", "b", "c", "d"],
            records.iter().map(|r| r.team.as_str()).collect::<Vec<_>>()
        );

        let a = record_of(&records, "a");
        assert_eq!((1, 0, 1, 2), (a.wins, a.ties, a.losses, a.games_played));
        assert_eq!(170.0, a.points_for);
        assert_eq!(200.0, a.points_against);
        assert_eq!(Some(100.0), a.max_score);
        assert_eq!(Some(70.0), a.min_score);
        assert_eq!(0.5, a.win_pct());

        let c = record_of(&records, "c");
        assert_eq!((1, 1, 0), (c.wins, c.ties, c.losses));
        assert_eq!(1.5, c.actual_win_equivalent());
        assert_eq!(0.75, c.win_pct());

        for record in &records {
            assert_eq!(record.games_played, record.wins + record.ties + record.losses);
        }
    }

    #[test]
    fn luck_against_all_play() {
        // week 1: a (100) beats b (90); c (80) ties d (80)
        // all-play: a 1.0, b 2/3, c 1/6, d 1/6
        let rows = LeagueBuilder::default()
            .week(|w| w.game("a", 100.0, "b", 90.0).game("c", 80.0, "d", 80.0))
            .build();
        let roster = Roster::from_rows(&rows);
        let records = aggregate(&roster, &group_weeks(&rows, &WeekRange::new(1, 1)));

        let a = record_of(&records, "a");
        assert_eq!(1.0, a.all_play.expected_wins);
        assert_eq!(0.0, a.luck());

        let b = record_of(&records, "b");
        assert_f64_close(-2.0 / 3.0, b.luck());

        let c = record_of(&records, "c");
        assert_f64_close(0.5 - 1.0 / 6.0, c.luck());
        assert_eq!((0, 1, 2), (c.all_play.wins, c.all_play.ties, c.all_play.losses));
    }

    #[test]
    fn byes_and_unplayed_weeks_are_not_games() {
        let rows = LeagueBuilder::default()
            .week(|w| w.game("a", 100.0, "b", 90.0).bye("c"))
            .week(|w| w.unplayed("a", "c").bye("b"))
            .build();
        let roster = Roster::from_rows(&rows);
        let records = aggregate(&roster, &group_weeks(&rows, &WeekRange::new(1, 2)));

        let a = record_of(&records, "a");
        assert_eq!(1, a.games_played);
        assert_eq!(1, a.all_play.weeks);

        let c = record_of(&records, "c");
        assert_eq!(0, c.games_played);
        assert_eq!(0.0, c.points_for);
        assert_eq!(0.0, c.points_against);
        assert_eq!(None, c.max_score);
        assert_nan(c.win_pct());
        assert_nan(c.all_play.expected_win_pct());
    }

    #[test]
    fn zero_zero_counts_as_a_loss_for_both() {
        let rows = LeagueBuilder::default()
            .week(|w| w.game("a", 0.0, "b", 0.0))
            .build();
        let roster = Roster::from_rows(&rows);
        let records = aggregate(&roster, &group_weeks(&rows, &WeekRange::new(1, 1)));
        for record in &records {
            assert_eq!((0, 0, 1), (record.wins, record.ties, record.losses));
            assert_eq!(0.5, record.all_play.expected_wins);
        }
    }

    #[test]
    fn merge_sums_raw_counts() {
        let rows = LeagueBuilder::default()
            .week(|w| w.game("a", 100.0, "b", 90.0))
            .week(|w| w.game("a", 80.0, "b", 95.0))
            .build();
        let roster = Roster::from_rows(&rows);
        let first = aggregate(&roster, &group_weeks(&rows, &WeekRange::new(1, 1)));
        let second = aggregate(&roster, &group_weeks(&rows, &WeekRange::new(2, 2)));
        let whole = aggregate(&roster, &group_weeks(&rows, &WeekRange::new(1, 2)));

        let mut merged = first[0].clone();
        merged.merge(&second[0]);
        assert_eq!(whole[0], merged);
    }
}
