//! Extremal finishes: how often each team posted the week's best, worst, top-3 or bottom-3 score.

use crate::week::{Roster, WeekGroup};

/// Score thresholds of a single week, taken over the teams that scored.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekThresholds {
    pub max: f64,
    pub min: f64,
    /// The 3rd score from the top; the lowest score if fewer than three teams scored.
    pub third_highest: f64,
    /// The 3rd score from the bottom; the highest score if fewer than three teams scored.
    pub third_lowest: f64,
}
impl WeekThresholds {
    const DEPTH: usize = 3;

    pub fn of(group: &WeekGroup) -> Option<Self> {
        let mut scores = group.scores();
        if scores.is_empty() {
            return None;
        }
        scores.sort_by(|a, b| b.total_cmp(a));
        let nth = usize::min(Self::DEPTH, scores.len()) - 1;
        Some(Self {
            max: scores[0],
            min: scores[scores.len() - 1],
            third_highest: scores[nth],
            third_lowest: scores[scores.len() - 1 - nth],
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FinishCounts {
    pub top1: u32,
    pub top3: u32,
    pub bot1: u32,
    pub bot3: u32,
}
impl FinishCounts {
    pub fn tally(&mut self, score: f64, thresholds: &WeekThresholds) {
        if score >= thresholds.max {
            self.top1 += 1;
        }
        if score >= thresholds.third_highest {
            self.top3 += 1;
        }
        if score <= thresholds.min {
            self.bot1 += 1;
        }
        if score <= thresholds.third_lowest {
            self.bot3 += 1;
        }
    }

    pub fn merge(&mut self, other: &FinishCounts) {
        self.top1 += other.top1;
        self.top3 += other.top3;
        self.bot1 += other.bot1;
        self.bot3 += other.bot3;
    }
}

/// Counts extremal finishes for every team on the `roster`, returned in roster order. Ties at a
/// threshold count for every tied team.
pub fn count_finishes(roster: &Roster, groups: &[WeekGroup]) -> Vec<FinishCounts> {
    let mut counts = vec![FinishCounts::default(); roster.len()];
    for group in groups {
        let Some(thresholds) = WeekThresholds::of(group) else {
            continue;
        };
        for (team, score) in group.scored() {
            if let Some(index) = roster.index_of(team) {
                counts[index].tally(score, &thresholds);
            }
        }
    }
    counts
}

/// Competition rank of `team` in its week: one more than the number of strictly higher scores.
/// `None` if the team did not score.
pub fn week_rank(group: &WeekGroup, team: &str) -> Option<usize> {
    let score = group.score(team)?;
    Some(1 + group.scored().filter(|&(_, other)| other > score).count())
}
