//! A week-by-week log of one team's season: results, running record and where the team and its
//! opponent finished in the league that week.

use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};
use tracing::debug;

use crate::error::{LookupError, SummaryError};
use crate::finishes::week_rank;
use crate::integrity;
use crate::record::{MatchRow, Opponent, Outcome};
use crate::week::{group_weeks, Roster, WeekRange};

/// Verdicts on a result, judged by where the team and its opponent ranked among the week's scorers.
/// Rank thresholds are fractions of one more than the number of scorers, so that a fraction of
/// one half marks the median rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, Display)]
pub enum Verdict {
    /// Won with a score in the bottom half.
    #[strum(to_string = "lucky")]
    Lucky,
    /// Won with a score in the bottom 35%.
    #[strum(to_string = "very lucky")]
    VeryLucky,
    /// Won with a score in the bottom 20%.
    #[strum(to_string = "lotto")]
    Lotto,
    /// Beat an opponent who scored in the top half.
    #[strum(to_string = "key win")]
    KeyWin,
    /// Beat an opponent who scored in the top quarter.
    #[strum(to_string = "built different")]
    BuiltDifferent,
    /// Lost to an opponent who scored in the bottom half.
    #[strum(to_string = "missed opportunity")]
    MissedOpportunity,
    /// Lost to an opponent who scored in the bottom 30%.
    #[strum(to_string = "beefed")]
    Beefed,
    /// Lost with a score in the top half.
    #[strum(to_string = "unlucky")]
    Unlucky,
    /// Lost with a score in the top 30%.
    #[strum(to_string = "very unlucky")]
    VeryUnlucky,
    /// Lost with a score in the top 20%.
    #[strum(to_string = "cursed")]
    Cursed,
}
impl Verdict {
    /// Whether the verdict applies to a result. `rank` and `opponent_rank` are competition ranks
    /// among `scorers` teams.
    pub fn applies(
        &self,
        outcome: Outcome,
        rank: Option<usize>,
        opponent_rank: Option<usize>,
        scorers: usize,
    ) -> bool {
        let scale = (scorers + 1) as f64;
        let at_least = |rank: Option<usize>, fraction: f64| {
            rank.map_or(false, |rank| rank as f64 >= fraction * scale)
        };
        let at_most = |rank: Option<usize>, fraction: f64| {
            rank.map_or(false, |rank| rank as f64 <= fraction * scale)
        };
        match self {
            Verdict::Lucky => outcome == Outcome::Win && at_least(rank, 0.5),
            Verdict::VeryLucky => outcome == Outcome::Win && at_least(rank, 0.65),
            Verdict::Lotto => outcome == Outcome::Win && at_least(rank, 0.8),
            Verdict::KeyWin => outcome == Outcome::Win && at_most(opponent_rank, 0.5),
            Verdict::BuiltDifferent => outcome == Outcome::Win && at_most(opponent_rank, 0.25),
            Verdict::MissedOpportunity => outcome == Outcome::Loss && at_least(opponent_rank, 0.5),
            Verdict::Beefed => outcome == Outcome::Loss && at_least(opponent_rank, 0.7),
            Verdict::Unlucky => outcome == Outcome::Loss && at_most(rank, 0.5),
            Verdict::VeryUnlucky => outcome == Outcome::Loss && at_most(rank, 0.3),
            Verdict::Cursed => outcome == Outcome::Loss && at_most(rank, 0.2),
        }
    }
}

/// Every verdict that applies to a result, in declaration order. Ties and unplayed games have none.
pub fn verdicts(
    outcome: Option<Outcome>,
    rank: Option<usize>,
    opponent_rank: Option<usize>,
    scorers: usize,
) -> Vec<Verdict> {
    let Some(outcome) = outcome else {
        return vec![];
    };
    Verdict::iter()
        .filter(|verdict| verdict.applies(outcome, rank, opponent_rank, scorers))
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpotlightWeek {
    pub week: u32,
    pub opponent: Opponent,
    pub score: Option<f64>,
    pub opponent_score: Option<f64>,
    pub outcome: Option<Outcome>,
    pub running_wins: u32,
    pub running_ties: u32,
    pub running_losses: u32,
    /// 1-based rank of the team's score among the week's scorers.
    pub rank: Option<usize>,
    pub opponent_rank: Option<usize>,
    /// Number of teams that scored in the week.
    pub scorers: usize,
    pub verdicts: Vec<Verdict>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Spotlight {
    pub team: String,
    pub weeks: Vec<SpotlightWeek>,
}
impl Spotlight {
    /// Builds the log for the team matching `query` (case-insensitive; an exact name wins over
    /// partial matches).
    pub fn compute(rows: &[MatchRow], range: WeekRange, query: &str) -> Result<Self, SummaryError> {
        let roster = Roster::from_rows(rows);
        integrity::validate(rows, &roster, &range)?;
        let team = find_team(&roster, query)?;
        debug!("spotlight on '{team}' over weeks {range}");

        let (mut wins, mut ties, mut losses) = (0, 0, 0);
        let mut weeks = vec![];
        for group in group_weeks(rows, &range) {
            let Some(row) = group.row(team) else {
                continue;
            };
            let outcome = row.outcome();
            match outcome {
                Some(Outcome::Win) => wins += 1,
                Some(Outcome::Tie) => ties += 1,
                Some(Outcome::Loss) => losses += 1,
                None => {}
            }
            let rank = week_rank(&group, team);
            let opponent_rank = row
                .opponent
                .name()
                .and_then(|opponent| week_rank(&group, opponent));
            let scorers = group.scored().count();
            weeks.push(SpotlightWeek {
                week: group.week,
                opponent: row.opponent.clone(),
                score: row.score,
                opponent_score: row.opponent_score,
                outcome,
                running_wins: wins,
                running_ties: ties,
                running_losses: losses,
                rank,
                opponent_rank,
                scorers,
                verdicts: verdicts(outcome, rank, opponent_rank, scorers),
            });
        }
        Ok(Self {
            team: team.to_string(),
            weeks,
        })
    }

    pub fn lucky_wins(&self) -> impl Iterator<Item = &SpotlightWeek> {
        self.weeks
            .iter()
            .filter(|week| week.verdicts.contains(&Verdict::Lucky))
    }

    pub fn unlucky_losses(&self) -> impl Iterator<Item = &SpotlightWeek> {
        self.weeks
            .iter()
            .filter(|week| week.verdicts.contains(&Verdict::Unlucky))
    }
}

fn find_team<'a>(roster: &'a Roster, query: &str) -> Result<&'a str, LookupError> {
    let needle = query.trim().to_lowercase();
    if let Some(exact) = roster.iter().find(|team| team.to_lowercase() == needle) {
        return Ok(exact);
    }
    let candidates: Vec<_> = roster
        .iter()
        .filter(|team| team.to_lowercase().contains(&needle))
        .collect();
    match candidates.as_slice() {
        [] => Err(LookupError::UnknownTeam {
            query: query.to_string(),
        }),
        [team] => Ok(*team),
        _ => Err(LookupError::AmbiguousTeam {
            query: query.to_string(),
            candidates: candidates.iter().map(ToString::to_string).collect(),
        }),
    }
}
