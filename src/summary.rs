//! The season summary table: one [TeamSeasonSummary] per team, joining actual records, all-play
//! expectations, extremal finishes and the naive projection.
//!
//! Values are kept unrounded throughout; [SeasonSummary::rounded] produces a presentation copy.
//! Summaries over disjoint week ranges or seasons may be folded together with
//! [SeasonSummary::combine], which sums raw counts rather than rounded ratios.

use std::cmp::Ordering;

use ordinalizer::Ordinal;
use rustc_hash::FxHashMap;
use strum_macros::{Display, EnumCount, EnumIter, EnumString};
use tracing::debug;

use crate::all_play::AllPlayTally;
use crate::error::{ConfigError, SummaryError};
use crate::finishes::{count_finishes, FinishCounts};
use crate::integrity;
use crate::record::MatchRow;
use crate::standings::{aggregate, TeamRecord};
use crate::week::{group_weeks, Roster, WeekRange};

pub const DEFAULT_DECIMALS: u32 = 3;

/// Columns of the summary table, in display order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Ordinal, EnumCount, EnumIter, EnumString, Display,
)]
#[strum(ascii_case_insensitive)]
pub enum Column {
    Team,
    #[strum(to_string = "W", serialize = "wins")]
    Wins,
    #[strum(to_string = "T", serialize = "ties")]
    Ties,
    #[strum(to_string = "L", serialize = "losses")]
    Losses,
    #[strum(to_string = "Pct", serialize = "win_pct")]
    WinPct,
    #[strum(to_string = "Actual", serialize = "actual_wins")]
    ActualWins,
    #[strum(to_string = "Exp", serialize = "expected_wins")]
    ExpectedWins,
    #[strum(to_string = "ExpPct", serialize = "expected_win_pct")]
    ExpectedWinPct,
    Luck,
    #[strum(to_string = "PF", serialize = "points_for")]
    PointsFor,
    #[strum(to_string = "PA", serialize = "points_against")]
    PointsAgainst,
    #[strum(to_string = "Max", serialize = "max_score")]
    MaxScore,
    #[strum(to_string = "Min", serialize = "min_score")]
    MinScore,
    Top1,
    Top3,
    Bot1,
    Bot3,
    #[strum(to_string = "APW", serialize = "all_play_wins")]
    AllPlayWins,
    #[strum(to_string = "APT", serialize = "all_play_ties")]
    AllPlayTies,
    #[strum(to_string = "APL", serialize = "all_play_losses")]
    AllPlayLosses,
    #[strum(to_string = "Proj", serialize = "projected_wins")]
    ProjectedWins,
}

impl From<Column> for usize {
    fn from(column: Column) -> Self {
        column.ordinal()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(ascii_case_insensitive)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryOptions {
    /// Total weeks scheduled in the season. Required when projecting.
    pub season_length: Option<u32>,
    pub project: bool,
    pub sort: Column,
    pub direction: SortDirection,
}
impl SummaryOptions {
    pub fn with_projections(mut self, season_length: u32) -> Self {
        self.season_length = Some(season_length);
        self.project = true;
        self
    }

    pub fn with_sort(mut self, sort: Column, direction: SortDirection) -> Self {
        self.sort = sort;
        self.direction = direction;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.season_length {
            Some(0) => Err(ConfigError::ZeroSeasonLength),
            None if self.project => Err(ConfigError::MissingSeasonLength),
            _ => Ok(()),
        }
    }

    fn projection_length(&self) -> Option<u32> {
        if self.project {
            self.season_length
        } else {
            None
        }
    }
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            season_length: None,
            project: false,
            sort: Column::WinPct,
            direction: SortDirection::Desc,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeamSeasonSummary {
    pub team: String,
    pub wins: u32,
    pub ties: u32,
    pub losses: u32,
    pub games_played: u32,
    /// NaN when no games have been played.
    pub win_pct: f64,
    pub actual_wins: f64,
    pub expected_wins: f64,
    pub expected_win_pct: f64,
    pub all_play_weeks: u32,
    pub luck: f64,
    pub points_for: f64,
    pub points_against: f64,
    pub max_score: Option<f64>,
    pub min_score: Option<f64>,
    pub top1: u32,
    pub top3: u32,
    pub bot1: u32,
    pub bot3: u32,
    pub all_play_wins: u32,
    pub all_play_ties: u32,
    pub all_play_losses: u32,
    pub projected_wins: Option<f64>,
}
impl TeamSeasonSummary {
    pub fn assemble(record: &TeamRecord, finishes: &FinishCounts, season_length: Option<u32>) -> Self {
        let win_pct = record.win_pct();
        let actual_wins = record.actual_win_equivalent();
        let projected_wins = season_length.map(|season_length| {
            let weeks_remaining = season_length.saturating_sub(record.games_played);
            actual_wins + win_pct * weeks_remaining as f64
        });
        Self {
            team: record.team.clone(),
            wins: record.wins,
            ties: record.ties,
            losses: record.losses,
            games_played: record.games_played,
            win_pct,
            actual_wins,
            expected_wins: record.all_play.expected_wins,
            expected_win_pct: record.all_play.expected_win_pct(),
            all_play_weeks: record.all_play.weeks,
            luck: record.luck(),
            points_for: record.points_for,
            points_against: record.points_against,
            max_score: record.max_score,
            min_score: record.min_score,
            top1: finishes.top1,
            top3: finishes.top3,
            bot1: finishes.bot1,
            bot3: finishes.bot3,
            all_play_wins: record.all_play.wins,
            all_play_ties: record.all_play.ties,
            all_play_losses: record.all_play.losses,
            projected_wins,
        }
    }

    /// The raw record underlying this summary.
    pub fn record(&self) -> TeamRecord {
        TeamRecord {
            team: self.team.clone(),
            wins: self.wins,
            ties: self.ties,
            losses: self.losses,
            games_played: self.games_played,
            points_for: self.points_for,
            points_against: self.points_against,
            max_score: self.max_score,
            min_score: self.min_score,
            all_play: AllPlayTally {
                expected_wins: self.expected_wins,
                weeks: self.all_play_weeks,
                wins: self.all_play_wins,
                ties: self.all_play_ties,
                losses: self.all_play_losses,
            },
        }
    }

    pub fn finishes(&self) -> FinishCounts {
        FinishCounts {
            top1: self.top1,
            top3: self.top3,
            bot1: self.bot1,
            bot3: self.bot3,
        }
    }

    /// Numeric value of a column; `None` for the team name and for absent optional values.
    pub fn metric(&self, column: Column) -> Option<f64> {
        match column {
            Column::Team => None,
            Column::Wins => Some(self.wins as f64),
            Column::Ties => Some(self.ties as f64),
            Column::Losses => Some(self.losses as f64),
            Column::WinPct => Some(self.win_pct),
            Column::ActualWins => Some(self.actual_wins),
            Column::ExpectedWins => Some(self.expected_wins),
            Column::ExpectedWinPct => Some(self.expected_win_pct),
            Column::Luck => Some(self.luck),
            Column::PointsFor => Some(self.points_for),
            Column::PointsAgainst => Some(self.points_against),
            Column::MaxScore => self.max_score,
            Column::MinScore => self.min_score,
            Column::Top1 => Some(self.top1 as f64),
            Column::Top3 => Some(self.top3 as f64),
            Column::Bot1 => Some(self.bot1 as f64),
            Column::Bot3 => Some(self.bot3 as f64),
            Column::AllPlayWins => Some(self.all_play_wins as f64),
            Column::AllPlayTies => Some(self.all_play_ties as f64),
            Column::AllPlayLosses => Some(self.all_play_losses as f64),
            Column::ProjectedWins => self.projected_wins,
        }
    }

    /// Renders a column for display, with real-valued columns to `decimals` places. NaN and absent
    /// values render as `-`.
    pub fn cell(&self, column: Column, decimals: u32) -> String {
        match column {
            Column::Team => self.team.clone(),
            Column::Wins
            | Column::Ties
            | Column::Losses
            | Column::Top1
            | Column::Top3
            | Column::Bot1
            | Column::Bot3
            | Column::AllPlayWins
            | Column::AllPlayTies
            | Column::AllPlayLosses => format!("{}", self.metric(column).unwrap_or_default()),
            _ => match self.metric(column) {
                Some(value) if !value.is_nan() => {
                    format!("{:.*}", decimals as usize, round(value, decimals))
                }
                _ => "-".into(),
            },
        }
    }

    fn rounded(&self, decimals: u32) -> Self {
        let r = |value: f64| round(value, decimals);
        Self {
            win_pct: r(self.win_pct),
            actual_wins: r(self.actual_wins),
            expected_wins: r(self.expected_wins),
            expected_win_pct: r(self.expected_win_pct),
            luck: r(self.luck),
            points_for: r(self.points_for),
            points_against: r(self.points_against),
            max_score: self.max_score.map(r),
            min_score: self.min_score.map(r),
            projected_wins: self.projected_wins.map(r),
            ..self.clone()
        }
    }
}

fn compare(
    a: &TeamSeasonSummary,
    b: &TeamSeasonSummary,
    column: Column,
    direction: SortDirection,
) -> Ordering {
    let directed = |ordering: Ordering| match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    };
    if column == Column::Team {
        return directed(a.team.cmp(&b.team));
    }
    let a = a.metric(column).filter(|value| !value.is_nan());
    let b = b.metric(column).filter(|value| !value.is_nan());
    match (a, b) {
        (Some(a), Some(b)) => directed(a.total_cmp(&b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Rounds half away from zero to the given number of decimal places. NaN passes through.
pub fn round(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeasonSummary {
    /// The weeks summarised, or `None` for a combination of several summaries.
    pub range: Option<WeekRange>,
    pub teams: Vec<TeamSeasonSummary>,
}
impl SeasonSummary {
    /// Summarises `rows` over `range`. The input is validated in full before aggregation; an
    /// integrity violation aborts the whole computation.
    pub fn compute(
        rows: &[MatchRow],
        range: WeekRange,
        options: &SummaryOptions,
    ) -> Result<Self, SummaryError> {
        options.validate()?;
        let roster = Roster::from_rows(rows);
        integrity::validate(rows, &roster, &range)?;

        let groups = group_weeks(rows, &range);
        debug!(
            "summarising {} teams over weeks {range} ({} weeks with rows)",
            roster.len(),
            groups.len()
        );
        let records = aggregate(&roster, &groups);
        let finishes = count_finishes(&roster, &groups);
        let season_length = options.projection_length();
        let teams = records
            .iter()
            .zip(finishes.iter())
            .map(|(record, finishes)| TeamSeasonSummary::assemble(record, finishes, season_length))
            .collect();

        let mut summary = Self {
            range: Some(range),
            teams,
        };
        summary.sort(options.sort, options.direction);
        Ok(summary)
    }

    /// Folds several summaries (e.g., consecutive week ranges or whole seasons) into one by summing
    /// their raw counts and points, then re-deriving the ratios. Projections are not carried.
    pub fn combine<'a>(
        summaries: impl IntoIterator<Item = &'a SeasonSummary>,
        options: &SummaryOptions,
    ) -> Result<Self, SummaryError> {
        options.validate()?;
        let mut roster = Roster::default();
        let mut records: Vec<TeamRecord> = vec![];
        let mut finishes: Vec<FinishCounts> = vec![];
        let mut parts = 0;
        for summary in summaries {
            parts += 1;
            for team in &summary.teams {
                let index = roster.insert(&team.team);
                if index == records.len() {
                    records.push(team.record());
                    finishes.push(team.finishes());
                } else {
                    records[index].merge(&team.record());
                    finishes[index].merge(&team.finishes());
                }
            }
        }
        debug!("combined {parts} summaries covering {} teams", roster.len());

        let teams = records
            .iter()
            .zip(finishes.iter())
            .map(|(record, finishes)| TeamSeasonSummary::assemble(record, finishes, None))
            .collect();
        let mut combined = Self { range: None, teams };
        combined.sort(options.sort, options.direction);
        Ok(combined)
    }

    /// Stable sort by `column`. NaN and absent values sort last in either direction.
    pub fn sort(&mut self, column: Column, direction: SortDirection) {
        self.teams.sort_by(|a, b| compare(a, b, column, direction));
    }

    /// A copy with every real-valued column rounded to `decimals` places, for presentation only.
    pub fn rounded(&self, decimals: u32) -> Self {
        Self {
            range: self.range,
            teams: self.teams.iter().map(|team| team.rounded(decimals)).collect(),
        }
    }

    pub fn team(&self, team: &str) -> Option<&TeamSeasonSummary> {
        self.teams.iter().find(|summary| summary.team == team)
    }

    pub fn by_team(&self) -> FxHashMap<&str, &TeamSeasonSummary> {
        self.teams
            .iter()
            .map(|summary| (summary.team.as_str(), summary))
            .collect()
    }
}

/// One team's summary for one season, labelled with the season it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamSeason {
    pub season: String,
    pub summary: TeamSeasonSummary,
}

/// Every (season, team) pair across several seasons in a single table, so that individual
/// seasons can be ranked against each other.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamSeasons {
    pub rows: Vec<TeamSeason>,
}
impl TeamSeasons {
    pub fn push(&mut self, season: impl Into<String>, summary: &SeasonSummary) {
        let season = season.into();
        self.rows
            .extend(summary.teams.iter().map(|team| TeamSeason {
                season: season.clone(),
                summary: team.clone(),
            }));
    }

    /// Stable sort by `column`, with the same ordering rules as [SeasonSummary::sort]. Rows that
    /// compare equal keep their season order.
    pub fn sort(&mut self, column: Column, direction: SortDirection) {
        self.rows.sort_by(|a, b| compare(&a.summary, &b.summary, column, direction));
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
