//! The all-play engine. Each week, every scored team is virtually matched against every other
//! scored team; the fraction of those games it would have won is its all-play credit for the week.

use tracing::trace;

use crate::week::WeekGroup;

/// One team's all-play result for one week.
#[derive(Debug, Clone, PartialEq)]
pub struct AllPlayCredit {
    pub team: String,
    /// Win share over the virtual games, in `[0, 1]`.
    pub credit: f64,
    pub compared: usize,
    pub wins: u32,
    pub ties: u32,
    pub losses: u32,
}

/// Computes the all-play credit of every team that scored in `group`, in row order. Teams without
/// a score are neither credited nor compared against; a lone scorer has nobody to play and is
/// omitted.
pub fn week_credits(group: &WeekGroup) -> Vec<AllPlayCredit> {
    let scored: Vec<_> = group.scored().collect();
    let mut credits = Vec::with_capacity(scored.len());
    for (index, &(team, score)) in scored.iter().enumerate() {
        let (mut wins, mut ties, mut losses) = (0, 0, 0);
        for (other_index, &(_, other_score)) in scored.iter().enumerate() {
            if other_index == index {
                continue;
            }
            if score > other_score {
                wins += 1;
            } else if score == other_score {
                ties += 1;
            } else {
                losses += 1;
            }
        }
        let compared = (wins + ties + losses) as usize;
        if compared == 0 {
            continue;
        }
        let credit = (wins as f64 + 0.5 * ties as f64) / compared as f64;
        credits.push(AllPlayCredit {
            team: team.to_string(),
            credit,
            compared,
            wins,
            ties,
            losses,
        });
    }
    trace!("week {} all-play credits: {credits:?}", group.week);
    credits
}

/// All-play totals for one team over a range of weeks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AllPlayTally {
    pub expected_wins: f64,
    /// Weeks in which the team was compared against at least one opponent. This is the divisor of
    /// [expected_win_pct](Self::expected_win_pct), and differs from the weeks in which the team
    /// scored only when it was the week's sole scorer.
    pub weeks: u32,
    pub wins: u32,
    pub ties: u32,
    pub losses: u32,
}
impl AllPlayTally {
    pub fn add(&mut self, credit: &AllPlayCredit) {
        self.expected_wins += credit.credit;
        self.weeks += 1;
        self.wins += credit.wins;
        self.ties += credit.ties;
        self.losses += credit.losses;
    }

    /// Average weekly all-play credit; NaN if the team was never compared.
    pub fn expected_win_pct(&self) -> f64 {
        if self.weeks == 0 {
            f64::NAN
        } else {
            self.expected_wins / self.weeks as f64
        }
    }

    pub fn merge(&mut self, other: &AllPlayTally) {
        self.expected_wins += other.expected_wins;
        self.weeks += other.weeks;
        self.wins += other.wins;
        self.ties += other.ties;
        self.losses += other.losses;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::MatchRow;
    use crate::testing::{assert_f64_close, assert_nan};
    use crate::week::{group_weeks, WeekRange};

    fn credit_of<'a>(credits: &'a [AllPlayCredit], team: &str) -> &'a AllPlayCredit {
        credits.iter().find(|credit| credit.team == team).unwrap()
    }

    fn single_week(scores: &[(&str, Option<f64>)]) -> Vec<MatchRow> {
        scores
            .iter()
            .map(|&(team, score)| MatchRow {
                score,
                ..MatchRow::bye(1, team)
            })
            .collect()
    }

    #[test]
    fn three_teams_with_a_tie_for_last() {
        let rows = single_week(&[("a", Some(100.0)), ("b", Some(90.0)), ("c", Some(90.0))]);
        let groups = group_weeks(&rows, &WeekRange::new(1, 1));
        let credits = week_credits(&groups[0]);
        assert_eq!(3, credits.len());
        assert_eq!(1.0, credit_of(&credits, "a").credit);
        assert_eq!(0.25, credit_of(&credits, "b").credit);
        assert_eq!(0.25, credit_of(&credits, "c").credit);

        let b = credit_of(&credits, "b");
        assert_eq!((0, 1, 1), (b.wins, b.ties, b.losses));
        assert_eq!(2, b.compared);
    }

    #[test]
    fn highest_lowest_and_all_tied() {
        let rows = single_week(&[
            ("a", Some(50.0)),
            ("b", Some(120.0)),
            ("c", Some(80.0)),
            ("d", Some(10.0)),
        ]);
        let credits = week_credits(&group_weeks(&rows, &WeekRange::new(1, 1))[0]);
        assert_eq!(1.0, credit_of(&credits, "b").credit);
        assert_eq!(0.0, credit_of(&credits, "d").credit);
        assert_f64_close(1.0 / 3.0, credit_of(&credits, "a").credit);
        assert_f64_close(2.0 / 3.0, credit_of(&credits, "c").credit);

        let rows = single_week(&[("a", Some(75.0)), ("b", Some(75.0)), ("c", Some(75.0))]);
        let credits = week_credits(&group_weeks(&rows, &WeekRange::new(1, 1))[0]);
        assert!(credits.iter().all(|credit| credit.credit == 0.5));
    }

    #[test]
    fn unscored_teams_are_excluded_from_the_denominator() {
        let rows = single_week(&[("a", Some(100.0)), ("b", None), ("c", Some(90.0))]);
        let credits = week_credits(&group_weeks(&rows, &WeekRange::new(1, 1))[0]);
        assert_eq!(2, credits.len());
        assert_eq!(1, credit_of(&credits, "a").compared);
        assert_eq!(1.0, credit_of(&credits, "a").credit);
        assert_eq!(0.0, credit_of(&credits, "c").credit);
        assert!(credits.iter().all(|credit| credit.team != "b"));
    }

    #[test]
    fn lone_scorer_has_no_credit() {
        let rows = single_week(&[("a", Some(100.0)), ("b", None)]);
        let credits = week_credits(&group_weeks(&rows, &WeekRange::new(1, 1))[0]);
        assert!(credits.is_empty());
    }

    #[test]
    fn sole_scorer_week_is_not_a_tally_week() {
        let mut rows = single_week(&[("a", Some(100.0)), ("b", Some(90.0))]);
        rows.extend(
            single_week(&[("a", Some(80.0)), ("b", None)])
                .into_iter()
                .map(|row| MatchRow { week: 2, ..row }),
        );
        let mut tally = AllPlayTally::default();
        for group in group_weeks(&rows, &WeekRange::new(1, 2)) {
            for credit in week_credits(&group).iter().filter(|credit| credit.team == "a") {
                tally.add(credit);
            }
        }
        assert_eq!(1, tally.weeks);
        assert_eq!(1.0, tally.expected_win_pct());
    }

    #[test]
    fn credits_sum_to_half_the_pairings() {
        let rows = single_week(&[
            ("a", Some(12.0)),
            ("b", Some(40.0)),
            ("c", Some(40.0)),
            ("d", Some(7.5)),
            ("e", Some(99.0)),
        ]);
        let credits = week_credits(&group_weeks(&rows, &WeekRange::new(1, 1))[0]);
        let sum: f64 = credits.iter().map(|credit| credit.credit).sum();
        assert_f64_close(credits.len() as f64 / 2.0, sum);
    }

    #[test]
    fn tally_accumulates() {
        let mut tally = AllPlayTally::default();
        assert_nan(tally.expected_win_pct());
        tally.add(&AllPlayCredit {
            team: "a".into(),
            credit: 1.0,
            compared: 3,
            wins: 3,
            ties: 0,
            losses: 0,
        });
        tally.add(&AllPlayCredit {
            team: "a".into(),
            credit: 0.5,
            compared: 3,
            wins: 1,
            ties: 1,
            losses: 1,
        });
        assert_eq!(1.5, tally.expected_wins);
        assert_eq!(2, tally.weeks);
        assert_eq!(0.75, tally.expected_win_pct());
        assert_eq!((4, 1, 1), (tally.wins, tally.ties, tally.losses));
    }
}
