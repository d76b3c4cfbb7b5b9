//! Loading match rows from files and directories.

use std::ffi::OsStr;
use std::fs;
use std::fs::File;
use std::io::Error;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{from_reader, to_writer_pretty};
use tracing::debug;

use crate::csv::read_match_rows;
use crate::record::MatchRow;

/// Reads a JSON-encoded type from a given file `path`.
pub fn read_json<D: DeserializeOwned>(path: impl AsRef<Path>) -> Result<D, Error> {
    let file = File::open(path)?;
    Ok(from_reader(file)?)
}

/// JSON-encodes the `value` in pretty-printed form and writes it to a given `path`.
pub fn write_json(path: impl AsRef<Path>, value: &impl Serialize) -> Result<(), Error> {
    let file = File::create(path)?;
    Ok(to_writer_pretty(file, value)?)
}

pub trait ReadJsonFile<D> {
    fn read_json_file(path: impl AsRef<Path>) -> Result<D, Error>;
}

impl<D: DeserializeOwned> ReadJsonFile<D> for D {
    fn read_json_file(path: impl AsRef<Path>) -> Result<D, Error> {
        read_json(path)
    }
}

pub trait WriteJsonFile<S: Serialize> {
    fn write_json_file(&self, path: impl AsRef<Path>) -> Result<(), Error>;
}

impl<S: Serialize> WriteJsonFile<S> for S {
    fn write_json_file(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        write_json(path, self)
    }
}

/// Recursively locates all files in a given directory matching the supplied `extension_filter`. The
/// located files are written into the `files` vector. If the given `path` is a file that matches the
/// filter (rather than a directory), it is added to `files`.
pub fn recurse_dir(
    path: PathBuf,
    files: &mut Vec<PathBuf>,
    extension_filter: &mut impl FnMut(&OsStr) -> bool,
) -> Result<(), Error> {
    let md = fs::metadata(&path)?;
    if md.is_dir() {
        let entries = fs::read_dir(path)?;
        for entry in entries {
            recurse_dir(entry?.path(), files, extension_filter)?;
        }
    } else if extension_filter(path.extension().unwrap_or_default()) {
        files.push(path);
    }
    Ok(())
}

fn is_season_file(extension: &OsStr) -> bool {
    extension == "csv" || extension == "json"
}

/// Reads one season's rows, choosing the format by file extension: `.csv` or `.json` (an array of
/// rows).
pub fn read_season(path: impl AsRef<Path>) -> anyhow::Result<Vec<MatchRow>> {
    let path = path.as_ref();
    let extension = path.extension().unwrap_or_default();
    let rows = if extension == "csv" {
        read_match_rows(path)?
    } else if extension == "json" {
        Vec::<MatchRow>::read_json_file(path)
            .with_context(|| format!("reading {}", path.display()))?
    } else {
        bail!("unsupported file type: {}", path.display());
    };
    debug!("read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Locates every season file under the given paths, in sorted order so that seasons named by year
/// come out chronologically.
pub fn season_files(paths: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = vec![];
    for path in paths {
        recurse_dir(path.clone(), &mut files, &mut is_season_file)
            .with_context(|| format!("scanning {}", path.display()))?;
    }
    files.sort();
    files.dedup();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use std::env;

    use super::*;
    use crate::testing::LeagueBuilder;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("allplay-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn json_rows() {
        let dir = scratch_dir("json");
        let rows = LeagueBuilder::default()
            .week(|w| w.game("a", 100.0, "b", 90.0).bye("c"))
            .week(|w| w.unplayed("a", "c").bye("b"))
            .build();
        let path = dir.join("2023.json");
        rows.write_json_file(&path).unwrap();
        assert_eq!(rows, read_season(&path).unwrap());
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn json_with_null_opponent() {
        let dir = scratch_dir("null");
        let path = dir.join("season.json");
        fs::write(
            &path,
            r#"[{"week": 1, "team": "a", "opponent": null, "score": null, "opponent_score": null},
                {"week": 1, "team": "b"}]"#,
        )
        .unwrap();
        assert_eq!(
            vec![MatchRow::bye(1, "a"), MatchRow::bye(1, "b")],
            read_season(&path).unwrap()
        );
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn unsupported_extension() {
        let err = read_season("season.txt").unwrap_err();
        assert!(err.to_string().contains("unsupported"));
    }

    #[test]
    fn season_files_in_order() {
        let dir = scratch_dir("seasons");
        fs::create_dir_all(dir.join("older")).unwrap();
        for name in ["2022.csv", "2021.json", "notes.txt", "older/2019.csv"] {
            fs::write(dir.join(name), "").unwrap();
        }
        let files = season_files(&[dir.clone()]).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|file| file.strip_prefix(&dir).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            vec![
                PathBuf::from("2021.json"),
                PathBuf::from("2022.csv"),
                PathBuf::from("older/2019.csv"),
            ],
            names
        );
        fs::remove_dir_all(dir).unwrap();
    }
}
