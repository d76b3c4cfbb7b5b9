//! Reading match rows from, and writing summaries to, simple comma-separated files.
//!
//! The input format is a header line naming the columns `week`, `team`, `opponent`, `score` and
//! `opponent_score` (in any order), followed by one line per row. An empty score is a game not yet
//! played; an empty or `BYE` opponent is a bye. A field containing a comma or a double quote is
//! enclosed in double quotes, with embedded quotes doubled. Quoted fields may not span lines.

use std::borrow::Cow;
use std::fs::File;
use std::io;
use std::io::{BufRead, BufReader, BufWriter, Lines, Write};
use std::ops::{Index, IndexMut};
use std::path::Path;

use anyhow::{anyhow, bail, Context};
use strum::{EnumCount, IntoEnumIterator};

use crate::record::{MatchRow, Opponent};
use crate::summary::{Column, SeasonSummary};

pub struct CsvWriter<W: Write> {
    writer: BufWriter<W>,
}
impl CsvWriter<File> {
    pub fn create(path: impl AsRef<Path>) -> Result<Self, io::Error> {
        let file = File::create(path)?;
        Ok(Self::new(file))
    }
}
impl<W: Write> CsvWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
        }
    }

    pub fn append<R>(&mut self, record: R) -> Result<(), io::Error>
    where
        R: IntoIterator,
        R::Item: AsRef<str>,
    {
        let mut first = true;
        for datum in record.into_iter() {
            if first {
                first = false;
            } else {
                self.writer.write_all(b",")?;
            }
            let datum = datum.as_ref();
            if needs_quotes(datum) {
                let escaped = datum.replace('"', "\"\"");
                write!(self.writer, "\"{escaped}\"")?;
            } else {
                self.writer.write_all(datum.as_bytes())?;
            }
        }
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), io::Error> {
        self.writer.flush()
    }

    pub fn into_inner(self) -> Result<W, io::Error> {
        self.writer.into_inner().map_err(|err| err.into_error())
    }
}

fn needs_quotes(datum: &str) -> bool {
    datum.contains(',') || datum.contains('"') || datum.contains('\n') || datum.contains('\r')
}

/// Splits a line into trimmed fields, unquoting quoted fields.
fn split_fields(line: &str) -> anyhow::Result<Vec<String>> {
    let mut fields = vec![];
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(field.trim().to_string());
                field.clear();
            }
            _ => field.push(ch),
        }
    }
    if in_quotes {
        bail!("unterminated quoted field");
    }
    fields.push(field.trim().to_string());
    Ok(fields)
}

/// Writes the summary with a header row, rendering real values to `decimals` places.
pub fn write_summary<W: Write>(
    writer: &mut CsvWriter<W>,
    summary: &SeasonSummary,
    decimals: u32,
) -> Result<(), io::Error> {
    writer.append(Column::iter().map(|column| column.to_string()))?;
    for team in &summary.teams {
        let mut record = Record::with_capacity(Column::COUNT);
        for column in Column::iter() {
            record.set(column, team.cell(column, decimals));
        }
        writer.append(record)?;
    }
    writer.flush()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    items: Vec<Cow<'static, str>>,
}
impl Record {
    pub fn with_capacity(capacity: usize) -> Self {
        let mut items = Vec::with_capacity(capacity);
        items.resize_with(capacity, || Cow::Borrowed(""));
        Self { items }
    }

    pub fn set(&mut self, ordinal: impl Into<usize>, value: impl ToString) {
        self.items[ordinal.into()] = Cow::Owned(value.to_string())
    }
}

impl IntoIterator for Record {
    type Item = Cow<'static, str>;
    type IntoIter = std::vec::IntoIter<Cow<'static, str>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<I: Into<usize>> Index<I> for Record {
    type Output = Cow<'static, str>;

    fn index(&self, index: I) -> &Self::Output {
        &self.items[index.into()]
    }
}

impl<I: Into<usize>> IndexMut<I> for Record {
    fn index_mut(&mut self, index: I) -> &mut Self::Output {
        &mut self.items[index.into()]
    }
}

/// Positions of the input columns within a line.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Layout {
    week: usize,
    team: usize,
    opponent: usize,
    score: usize,
    opponent_score: usize,
}
impl Layout {
    fn parse(header: &str) -> anyhow::Result<Self> {
        let names: Vec<_> = split_fields(header)?
            .iter()
            .map(|name| name.to_lowercase())
            .collect();
        let position = |name: &str| {
            names
                .iter()
                .position(|candidate| candidate == name)
                .ok_or_else(|| anyhow!("missing column '{name}' in header '{header}'"))
        };
        Ok(Self {
            week: position("week")?,
            team: position("team")?,
            opponent: position("opponent")?,
            score: position("score")?,
            opponent_score: position("opponent_score")?,
        })
    }
}

pub struct MatchRowReader<R: BufRead> {
    lines: Lines<R>,
    layout: Layout,
    line_number: usize,
}
impl MatchRowReader<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        Self::new(BufReader::new(file))
    }
}
impl<R: BufRead> MatchRowReader<R> {
    pub fn new(reader: R) -> anyhow::Result<Self> {
        let mut lines = reader.lines();
        let header = lines.next().context("no header line")??;
        let layout = Layout::parse(&header)?;
        Ok(Self {
            lines,
            layout,
            line_number: 1,
        })
    }

    pub fn read(&mut self) -> Option<anyhow::Result<MatchRow>> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(err) => return Some(Err(err.into())),
            };
            self.line_number += 1;
            if line.trim().is_empty() {
                continue;
            }
            return Some(
                parse_row(&self.layout, &line)
                    .with_context(|| format!("line {}: '{line}'", self.line_number)),
            );
        }
    }
}

impl<R: BufRead> Iterator for MatchRowReader<R> {
    type Item = anyhow::Result<MatchRow>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read()
    }
}

fn parse_row(layout: &Layout, line: &str) -> anyhow::Result<MatchRow> {
    let fields = split_fields(line)?;
    let field = |index: usize| {
        fields
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| anyhow!("expected at least {} fields, got {}", index + 1, fields.len()))
    };
    let week: u32 = field(layout.week)?
        .parse()
        .context("week is not a positive integer")?;
    let team = field(layout.team)?;
    if team.is_empty() {
        bail!("empty team");
    }
    let opponent = Opponent::from(Some(field(layout.opponent)?.to_string()));
    Ok(MatchRow {
        week,
        team: team.to_string(),
        opponent,
        score: parse_score(field(layout.score)?)?,
        opponent_score: parse_score(field(layout.opponent_score)?)?,
    })
}

fn parse_score(field: &str) -> anyhow::Result<Option<f64>> {
    if field.is_empty() || field == "--" {
        Ok(None)
    } else {
        let score: f64 = field
            .parse()
            .with_context(|| format!("invalid score '{field}'"))?;
        Ok(Some(score))
    }
}

/// Reads every row of a match CSV file.
pub fn read_match_rows(path: impl AsRef<Path>) -> anyhow::Result<Vec<MatchRow>> {
    MatchRowReader::open(path)?.collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::SummaryOptions;
    use crate::testing::LeagueBuilder;
    use crate::week::WeekRange;

    #[test]
    fn read_rows_in_any_column_order() {
        let input = "team,week,opponent,opponent_score,score\n\
                     a,1,b,90.5,100\n\
                     b,1,a,100,90.5\n\
                     \n\
                     c,1,BYE,,\n\
                     a,2,,,\n\
                     b,2,c,--,--\n";
        let rows: Vec<_> = MatchRowReader::new(input.as_bytes())
            .unwrap()
            .collect::<anyhow::Result<_>>()
            .unwrap();
        assert_eq!(
            vec![
                MatchRow::game(1, "a", "b", Some(100.0), Some(90.5)),
                MatchRow::game(1, "b", "a", Some(90.5), Some(100.0)),
                MatchRow::bye(1, "c"),
                MatchRow::bye(2, "a"),
                MatchRow::game(2, "b", "c", None, None),
            ],
            rows
        );
    }

    #[test]
    fn missing_header_column() {
        let input = "week,team,score,opponent_score\n1,a,1,2\n";
        let err = MatchRowReader::new(input.as_bytes()).err().unwrap();
        assert!(err.to_string().contains("opponent"));
    }

    #[test]
    fn bad_score_reports_line() {
        let input = "week,team,opponent,score,opponent_score\n1,a,b,1,2\n1,b,a,x,1\n";
        let mut reader = MatchRowReader::new(input.as_bytes()).unwrap();
        assert!(reader.next().unwrap().is_ok());
        let err = reader.next().unwrap().unwrap_err();
        assert!(format!("{err:#}").contains("line 3"));
        assert!(reader.next().is_none());
    }

    #[test]
    fn summary_export() {
        let rows = LeagueBuilder::default()
            .week(|w| w.game("a", 100.0, "b", 90.0))
            .build();
        let summary =
            SeasonSummary::compute(&rows, WeekRange::new(1, 1), &SummaryOptions::default())
                .unwrap();
        let mut writer = CsvWriter::new(vec![]);
        write_summary(&mut writer, &summary, 2).unwrap();
        let output = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(3, lines.len());
        assert!(lines[0].starts_with("Team,W,T,L,Pct,"));
        assert!(lines[1].starts_with("a,1,0,0,1.00,"));
        assert!(lines[2].starts_with("b,0,0,1,0.00,"));
    }

    #[test]
    fn quoted_names() {
        let input = "week,team,opponent,score,opponent_score\n\
                     1,\"mitch hildreth, I. Reese\",b,100,90\n\
                     1,b,\"mitch hildreth, I. Reese\",90,100\n\
                     2,\"the \"\"real\"\" c\",BYE,,\n";
        let rows: Vec<_> = MatchRowReader::new(input.as_bytes())
            .unwrap()
            .collect::<anyhow::Result<_>>()
            .unwrap();
        assert_eq!(
            vec![
                MatchRow::game(1, "mitch hildreth, I. Reese", "b", Some(100.0), Some(90.0)),
                MatchRow::game(1, "b", "mitch hildreth, I. Reese", Some(90.0), Some(100.0)),
                MatchRow::bye(2, "the \"real\" c"),
            ],
            rows
        );
    }

    #[test]
    fn unterminated_quote() {
        let input = "week,team,opponent,score,opponent_score\n1,\"a,b,1,2\n";
        let mut reader = MatchRowReader::new(input.as_bytes()).unwrap();
        let err = reader.next().unwrap().unwrap_err();
        assert!(format!("{err:#}").contains("unterminated"));
    }

    #[test]
    fn summary_export_quotes_names() {
        let rows = LeagueBuilder::default()
            .week(|w| w.game("mitch hildreth, I. Reese", 100.0, "say \"when\"", 90.0))
            .build();
        let summary =
            SeasonSummary::compute(&rows, WeekRange::new(1, 1), &SummaryOptions::default())
                .unwrap();
        let mut writer = CsvWriter::new(vec![]);
        write_summary(&mut writer, &summary, 2).unwrap();
        let output = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        let lines: Vec<_> = output.lines().collect();
        assert!(lines[1].starts_with("\"mitch hildreth, I. Reese\",1,0,0,1.00,"));
        assert!(lines[2].starts_with("\"say \"\"when\"\"\",0,0,1,0.00,"));
        for line in &lines[1..] {
            let fields = split_fields(line).unwrap();
            assert_eq!(Column::COUNT, fields.len());
        }
        assert_eq!("mitch hildreth, I. Reese", split_fields(lines[1]).unwrap()[0]);
    }

    #[test]
    fn record_indexed_by_column() {
        let mut record = Record::with_capacity(Column::COUNT);
        record.set(Column::Luck, 0.25);
        assert_eq!("0.25", record[Column::Luck]);
        assert_eq!("", record[Column::Team]);
        record[Column::Team] = "a".into();
        assert_eq!("a", record[usize::from(Column::Team)]);
    }
}
