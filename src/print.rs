use stanza::style::{HAlign, Header, MinWidth, Separator, Styles};
use stanza::table::{Col, Row, Table};
use strum::IntoEnumIterator;

use crate::spotlight::Spotlight;
use crate::summary::{Column, SeasonSummary, TeamSeasonSummary, TeamSeasons};

fn format_opt(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(value) => format!("{value:.decimals$}"),
        None => "-".into(),
    }
}

fn summary_columns<'a>(mut teams: impl Iterator<Item = &'a TeamSeasonSummary>) -> Vec<Column> {
    let projected = teams.any(|team| team.projected_wins.is_some());
    Column::iter()
        .filter(|&column| column != Column::ProjectedWins || projected)
        .collect()
}

fn summary_col(column: Column) -> Col {
    match column {
        Column::Team => Col::new(
            Styles::default()
                .with(MinWidth(16))
                .with(HAlign::Left)
                .with(Separator(true)),
        ),
        Column::Losses | Column::Luck | Column::PointsAgainst | Column::Bot3 => Col::new(
            Styles::default()
                .with(MinWidth(6))
                .with(HAlign::Right)
                .with(Separator(true)),
        ),
        _ => Col::new(Styles::default().with(MinWidth(6)).with(HAlign::Right)),
    }
}

fn header_row(leading: Option<&str>, columns: &[Column]) -> Row {
    Row::new(
        Styles::default().with(Header(true)).with(Separator(true)),
        leading
            .into_iter()
            .map(ToString::to_string)
            .chain(columns.iter().map(ToString::to_string))
            .map(Into::into)
            .collect(),
    )
}

pub fn tabulate_summary(summary: &SeasonSummary, decimals: u32) -> Table {
    let columns = summary_columns(summary.teams.iter());
    let mut table = Table::default()
        .with_cols(columns.iter().map(|&column| summary_col(column)).collect())
        .with_row(header_row(None, &columns));

    for team in &summary.teams {
        table.push_row(Row::new(
            Styles::default(),
            columns
                .iter()
                .map(|&column| team.cell(column, decimals).into())
                .collect(),
        ));
    }
    table
}

/// One row per (season, team), led by the season label.
pub fn tabulate_team_seasons(team_seasons: &TeamSeasons, decimals: u32) -> Table {
    let columns = summary_columns(team_seasons.rows.iter().map(|row| &row.summary));
    let mut cols = vec![Col::new(
        Styles::default()
            .with(MinWidth(8))
            .with(HAlign::Left)
            .with(Separator(true)),
    )];
    cols.extend(columns.iter().map(|&column| summary_col(column)));
    let mut table = Table::default()
        .with_cols(cols)
        .with_row(header_row(Some("Season"), &columns));

    for row in &team_seasons.rows {
        table.push_row(Row::new(
            Styles::default(),
            std::iter::once(row.season.clone())
                .chain(
                    columns
                        .iter()
                        .map(|&column| row.summary.cell(column, decimals)),
                )
                .map(Into::into)
                .collect(),
        ));
    }
    table
}

pub fn tabulate_spotlight(spotlight: &Spotlight, decimals: u32) -> Table {
    let decimals = decimals as usize;
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(5)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(7)).with(HAlign::Centred)),
            Col::new(
                Styles::default()
                    .with(MinWidth(3))
                    .with(HAlign::Centred)
                    .with(Separator(true)),
            ),
            Col::new(Styles::default().with(MinWidth(16)).with(HAlign::Left)),
            Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Right)),
            Col::new(
                Styles::default()
                    .with(MinWidth(8))
                    .with(HAlign::Right)
                    .with(Separator(true)),
            ),
            Col::new(Styles::default().with(MinWidth(5)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(5)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Left)),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)).with(Separator(true)),
            vec![
                "Week".into(),
                "Record".into(),
                "".into(),
                "Opponent".into(),
                "Score".into(),
                "Opp".into(),
                "Rank".into(),
                "OppRk".into(),
                "".into(),
            ],
        ));

    for week in &spotlight.weeks {
        let record = if week.running_ties > 0 {
            format!(
                "{}-{}-{}",
                week.running_wins, week.running_losses, week.running_ties
            )
        } else {
            format!("{}-{}", week.running_wins, week.running_losses)
        };
        table.push_row(Row::new(
            Styles::default(),
            vec![
                week.week.to_string().into(),
                record.into(),
                week.outcome
                    .map(|outcome| outcome.to_string())
                    .unwrap_or_default()
                    .into(),
                week.opponent.to_string().into(),
                format_opt(week.score, decimals).into(),
                format_opt(week.opponent_score, decimals).into(),
                week.rank.map(|rank| rank.to_string()).unwrap_or_default().into(),
                week.opponent_rank
                    .map(|rank| rank.to_string())
                    .unwrap_or_default()
                    .into(),
                week.verdicts
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
                    .into(),
            ],
        ));
    }
    table
}
