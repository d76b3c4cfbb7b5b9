use std::env;
use std::error::Error;
use std::path::PathBuf;

use anyhow::bail;
use clap::Parser;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;
use tracing::{debug, info};

use allplay::csv::{write_summary, CsvWriter};
use allplay::file::read_season;
use allplay::print::{tabulate_spotlight, tabulate_summary};
use allplay::spotlight::Spotlight;
use allplay::summary::{Column, SeasonSummary, SortDirection, SummaryOptions, DEFAULT_DECIMALS};
use allplay::week::season_range;

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// file to source the match rows from (.csv or .json)
    #[clap(short = 'f', long)]
    file: PathBuf,

    /// first week to summarise
    #[clap(short = 's', long, default_value_t = 1)]
    start_week: u32,

    /// last week to summarise (capped at the most recent week with scores and the season length)
    #[clap(short = 'e', long)]
    end_week: Option<u32>,

    /// number of weeks in the regular season; later weeks (playoffs) are left out
    #[clap(short = 'l', long)]
    season_length: Option<u32>,

    /// project wins over the remainder of the season
    #[clap(short = 'p', long)]
    project: bool,

    /// column to sort by
    #[clap(long, default_value = "win_pct")]
    sort: Column,

    /// sort direction (asc or desc)
    #[clap(long, default_value = "desc")]
    direction: SortDirection,

    /// decimal places to display
    #[clap(short = 'd', long, default_value_t = DEFAULT_DECIMALS)]
    decimals: u32,

    /// show a week-by-week log for the matching team
    #[clap(short = 't', long)]
    team: Option<String>,

    /// export the summary to a CSV file
    #[clap(short = 'o', long)]
    out: Option<PathBuf>,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        if let Some(end_week) = self.end_week {
            if end_week < self.start_week {
                bail!(
                    "end week {end_week} cannot precede start week {}",
                    self.start_week
                );
            }
        }
        if self.project && self.season_length.is_none() {
            bail!("projections require a season length (-l)");
        }
        if self.decimals > 10 {
            bail!("at most 10 decimal places may be displayed");
        }
        Ok(())
    }

    fn options(&self) -> SummaryOptions {
        SummaryOptions {
            season_length: self.season_length,
            project: self.project,
            sort: self.sort,
            direction: self.direction,
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    if env::var("RUST_BACKTRACE").is_err() {
        env::set_var("RUST_BACKTRACE", "full")
    }
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info")
    }
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    args.validate()?;
    debug!("args: {args:?}");

    let rows = read_season(&args.file)?;
    let range = season_range(&rows, args.start_week, args.end_week, args.season_length);
    if range.is_empty() {
        info!("no completed weeks in {}", args.file.display());
    }

    let summary = SeasonSummary::compute(&rows, range, &args.options())?;
    info!(
        "weeks {range}:\n{}",
        Console::default().render(&tabulate_summary(&summary, args.decimals))
    );

    if let Some(out) = args.out.as_ref() {
        let mut writer = CsvWriter::create(out)?;
        write_summary(&mut writer, &summary, args.decimals)?;
        info!("summary written to {}", out.display());
    }

    if let Some(team) = args.team.as_ref() {
        let spotlight = Spotlight::compute(&rows, range, team)?;
        info!(
            "{}:\n{}",
            spotlight.team,
            Console::default().render(&tabulate_spotlight(&spotlight, args.decimals))
        );
        for week in spotlight.lucky_wins() {
            info!("lucky win in week {} against {}", week.week, week.opponent);
        }
        for week in spotlight.unlucky_losses() {
            info!("unlucky loss in week {} against {}", week.week, week.opponent);
        }
    }
    Ok(())
}
