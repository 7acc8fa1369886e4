//! Flat-file high-score list.
//!
//! One entry per line, `"<name> : <score>"`. The file is append-only: new
//! scores are added at the end and nothing is ever rewritten or deduplicated.
//! Names may contain spaces but not the `" : "` separator; reading splits on
//! the separator's last occurrence so everything before it is the name.

use std::fs::OpenOptions;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use log::debug;

/// Separator between name and score on disk.
const SEPARATOR: &str = " : ";

#[derive(thiserror::Error, Debug)]
pub enum ScoreboardError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("name contains the reserved \" : \" separator")]
    ReservedSeparator,
}

/// One persisted score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u32,
}

/// Append-only score store backed by a text file.
pub struct Scoreboard {
    path: PathBuf,
}

impl Scoreboard {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Scoreboard { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry, creating the file on first use.
    ///
    /// A name containing the separator could not be split back apart on
    /// read, so it is rejected instead of written.
    pub fn append(&self, name: &str, score: u32) -> Result<(), ScoreboardError> {
        if name.contains(SEPARATOR) {
            return Err(ScoreboardError::ReservedSeparator);
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}{}{}", name, SEPARATOR, score)?;
        Ok(())
    }

    /// Read all entries in append order. A missing file reads as empty;
    /// lines that do not parse are skipped.
    pub fn entries(&self) -> Result<Vec<ScoreEntry>, ScoreboardError> {
        let file = match std::fs::File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut entries = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line?;
            match parse_entry(&line) {
                Some(entry) => entries.push(entry),
                None => {
                    if !line.is_empty() {
                        debug!("skipping malformed scoreboard line: {:?}", line);
                    }
                }
            }
        }
        Ok(entries)
    }

    /// Read all entries sorted by score descending. The sort is stable, so
    /// equal scores keep their append order.
    pub fn ranked(&self) -> Result<Vec<ScoreEntry>, ScoreboardError> {
        let mut entries = self.entries()?;
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        Ok(entries)
    }
}

/// Split on the last `" : "` and parse the trailing token as the score.
fn parse_entry(line: &str) -> Option<ScoreEntry> {
    let (name, score) = line.rsplit_once(SEPARATOR)?;
    let score = score.trim().parse().ok()?;
    Some(ScoreEntry {
        name: name.to_string(),
        score,
    })
}

// =============================================================================
// Tests
// =============================================================================
