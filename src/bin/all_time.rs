use std::env;
use std::error::Error;
use std::ffi::OsStr;
use std::path::PathBuf;

use anyhow::bail;
use clap::Parser;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;
use tracing::{debug, info};

use allplay::csv::{write_summary, CsvWriter};
use allplay::file::{read_season, season_files};
use allplay::print::{tabulate_summary, tabulate_team_seasons};
use allplay::summary::{
    Column, SeasonSummary, SortDirection, SummaryOptions, TeamSeasons, DEFAULT_DECIMALS,
};
use allplay::week::season_range;

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// season files, or directories to search for .csv and .json season files
    paths: Vec<PathBuf>,

    /// number of weeks in each regular season; later weeks (playoffs) are left out
    #[clap(short = 'l', long)]
    season_length: Option<u32>,

    /// last week of each season to include
    #[clap(short = 'e', long)]
    end_week: Option<u32>,

    /// column to sort by
    #[clap(long, default_value = "win_pct")]
    sort: Column,

    /// sort direction (asc or desc)
    #[clap(long, default_value = "desc")]
    direction: SortDirection,

    /// decimal places to display
    #[clap(short = 'd', long, default_value_t = DEFAULT_DECIMALS)]
    decimals: u32,

    /// export the combined summary to a CSV file
    #[clap(short = 'o', long)]
    out: Option<PathBuf>,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        if self.paths.is_empty() {
            bail!("at least one season file or directory must be specified");
        }
        if self.season_length == Some(0) {
            bail!("season length must be at least one week");
        }
        if self.decimals > 10 {
            bail!("at most 10 decimal places may be displayed");
        }
        Ok(())
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

    let options = SummaryOptions::default().with_sort(args.sort, args.direction);
    let files = season_files(&args.paths)?;
    if files.is_empty() {
        return Err("no season files found".into());
    }

    let mut seasons = Vec::with_capacity(files.len());
    let mut team_seasons = TeamSeasons::default();
    for file in &files {
        let rows = read_season(file)?;
        let range = season_range(&rows, 1, args.end_week, args.season_length);
        let summary = SeasonSummary::compute(&rows, range, &options)?;
        debug!(
            "{} (weeks {range}):\n{}",
            file.display(),
            Console::default().render(&tabulate_summary(&summary, args.decimals))
        );
        let label = file
            .file_stem()
            .unwrap_or(OsStr::new("?"))
            .to_string_lossy();
        team_seasons.push(label, &summary);
        seasons.push(summary);
    }

    team_seasons.sort(args.sort, args.direction);
    info!(
        "team seasons:\n{}",
        Console::default().render(&tabulate_team_seasons(&team_seasons, args.decimals))
    );

    let combined = SeasonSummary::combine(&seasons, &options)?;
    info!(
        "all time ({} seasons):\n{}",
        seasons.len(),
        Console::default().render(&tabulate_summary(&combined, args.decimals))
    );

    if let Some(out) = args.out.as_ref() {
        let mut writer = CsvWriter::create(out)?;
        write_summary(&mut writer, &combined, args.decimals)?;
        info!("combined summary written to {}", out.display());
    }
    Ok(())
}
