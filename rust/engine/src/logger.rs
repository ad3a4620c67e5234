use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{create_dir_all, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::cards::CardId;
use crate::game::RoundConfig;
use crate::player::{Move, PlayerId};
use crate::scoring::ScoreBreakdown;

/// One applied move within a recorded round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub player_id: PlayerId,
    pub card_id: CardId,
    /// Table cards taken; empty for a discard
    #[serde(default)]
    pub capture_ids: Vec<CardId>,
    /// Whether the move swept the table for a scopa
    #[serde(default)]
    pub scopa: bool,
}

impl MoveRecord {
    pub fn as_move(&self) -> Move {
        Move::capture(self.card_id.clone(), self.capture_ids.clone())
    }
}

/// Complete history of one round, enough to replay it through the engine.
/// Serialized one record per line (JSONL).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// Unique identifier within a file (format: YYYYMMDD-NNNNNN)
    pub round_id: String,
    /// Registered deck the cards were loaded from
    pub deck: String,
    /// Shuffle seed; replaying with the same deck and seed reproduces the deal
    pub seed: u64,
    /// Seat order at the start of the round
    pub players: Vec<PlayerId>,
    #[serde(default)]
    pub config: RoundConfig,
    pub moves: Vec<MoveRecord>,
    /// Final round scores
    pub scores: BTreeMap<PlayerId, u32>,
    #[serde(default)]
    pub breakdown: Option<ScoreBreakdown>,
    /// RFC3339 time the record was written
    #[serde(default)]
    pub ts: Option<String>,
    #[serde(default)]
    pub meta: Option<serde_json::Value>,
}

pub fn format_round_id(yyyymmdd: &str, seq: u32) -> String {
    format!("{}-{:06}", yyyymmdd, seq)
}

/// Appends [`RoundRecord`]s to a JSONL file and hands out sequential round ids.
pub struct RoundLogger {
    writer: Option<BufWriter<File>>,
    date: String,
    seq: u32,
}

impl RoundLogger {
    /// Creates (or truncates) the file at `path`.
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        ensure_parent(path.as_ref())?;
        let f = File::create(path)?;
        Ok(Self::with_writer(f))
    }

    /// Opens `path` for appending, creating it if needed. Ids continue
    /// after the highest one already in the file for today's date.
    pub fn append<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let path = path.as_ref();
        ensure_parent(path)?;
        let mut logger = Self::with_writer(OpenOptions::new().create(true).append(true).open(path)?);
        logger.seq = last_seq(path, &logger.date)?;
        Ok(logger)
    }

    fn with_writer(f: File) -> Self {
        Self {
            writer: Some(BufWriter::new(f)),
            date: Utc::now().format("%Y%m%d").to_string(),
            seq: 0,
        }
    }

    /// A logger that writes nothing, with a fixed date for predictable ids.
    pub fn with_seq_for_test(date: &str) -> Self {
        Self {
            writer: None,
            date: date.to_string(),
            seq: 0,
        }
    }

    pub fn next_id(&mut self) -> String {
        self.seq += 1;
        format_round_id(&self.date, self.seq)
    }

    pub fn write(&mut self, record: &RoundRecord) -> std::io::Result<()> {
        let mut rec = record.clone();
        if rec.ts.is_none() {
            rec.ts = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        let line = serde_json::to_string(&rec).map_err(std::io::Error::other)?;
        if let Some(w) = &mut self.writer {
            w.write_all(line.as_bytes())?;
            w.write_all(b"\n")?;
            w.flush()?;
        }
        Ok(())
    }
}

fn ensure_parent(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => create_dir_all(parent),
        _ => Ok(()),
    }
}

#[derive(Deserialize)]
struct RoundIdOnly {
    round_id: String,
}

/// Highest sequence number among the `{date}-NNNNNN` ids in `path`.
/// Lines that do not parse are skipped.
fn last_seq(path: &Path, date: &str) -> std::io::Result<u32> {
    let prefix = format!("{}-", date);
    let reader = BufReader::new(File::open(path)?);
    let mut last = 0;
    for line in reader.lines() {
        let line = line?;
        let Ok(entry) = serde_json::from_str::<RoundIdOnly>(&line) else {
            continue;
        };
        if let Some(seq) = entry
            .round_id
            .strip_prefix(&prefix)
            .and_then(|n| n.parse::<u32>().ok())
        {
            last = last.max(seq);
        }
    }
    Ok(last)
}

/// Reads every record from a JSONL stream. Blank lines are skipped; a line
/// that fails to parse is reported with its 1-based line number.
pub fn read_records<R: BufRead>(reader: R) -> std::io::Result<Vec<(usize, Result<RoundRecord, String>)>> {
    let mut out = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let parsed = serde_json::from_str::<RoundRecord>(&line).map_err(|e| e.to_string());
        out.push((idx + 1, parsed));
    }
    Ok(out)
}
