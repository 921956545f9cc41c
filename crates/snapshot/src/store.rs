//! Reading and writing prediction snapshots.
//!
//! A snapshot is JSON Lines: one object per test session, in test-file
//! order, e.g.
//!
//! ```text
//! {"locale":"DE","next_item_prediction":["B09W9FND7K","B09JSPLN1M"]}
//! ```
//!
//! Saving goes through a temp file in the destination directory that is
//! persisted over the target path once fully written, so a failed run
//! never leaves a half-written snapshot behind.

use crate::error::{Result, SnapshotError};
use data_loader::{ItemId, Locale};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// One row of the snapshot: a test session's locale and its candidates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub locale: Locale,
    pub next_item_prediction: Vec<ItemId>,
}

impl PredictionRecord {
    pub fn new(locale: impl Into<Locale>, next_item_prediction: Vec<ItemId>) -> Self {
        Self {
            locale: locale.into(),
            next_item_prediction,
        }
    }
}

/// Write rows as JSON Lines to any writer
pub fn write_records<W: Write>(mut writer: W, records: &[PredictionRecord]) -> Result<()> {
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Read JSON Lines rows from any reader. Blank lines are skipped.
pub fn read_records<R: BufRead>(reader: R) -> Result<Vec<PredictionRecord>> {
    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|e| SnapshotError::Corrupt {
            line: idx + 1,
            reason: e.to_string(),
        })?;
        records.push(record);
    }
    Ok(records)
}

/// Save the prediction table to `path`, replacing any previous snapshot
pub fn save_snapshot(path: &Path, records: &[PredictionRecord]) -> Result<()> {
    let parent_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    debug!("Writing {} rows to {}", records.len(), temp_file.path().display());
    {
        let writer = BufWriter::new(&temp_file);
        write_records(writer, records)?;
    }
    temp_file.persist(path)?;

    info!("Saved {} prediction rows to {}", records.len(), path.display());
    Ok(())
}

/// Load a prediction table saved by [`save_snapshot`]
pub fn load_snapshot(path: &Path) -> Result<Vec<PredictionRecord>> {
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => SnapshotError::NotFound {
            path: path.display().to_string(),
        },
        _ => SnapshotError::Io(e),
    })?;
    let records = read_records(BufReader::new(file))?;
    info!("Loaded {} prediction rows from {}", records.len(), path.display());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<PredictionRecord> {
        vec![
            PredictionRecord::new("DE", vec!["B1".to_string(), "B2".to_string()]),
            PredictionRecord::new("JP", vec!["J'1".to_string(), "J\"2".to_string()]),
            PredictionRecord::new("UK", Vec::new()),
        ]
    }

    #[test]
    fn test_write_format() {
        let mut buffer = Vec::new();
        write_records(&mut buffer, &sample()[..1]).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "{\"locale\":\"DE\",\"next_item_prediction\":[\"B1\",\"B2\"]}\n"
        );
    }

    #[test]
    fn test_round_trip_in_memory() {
        let mut buffer = Vec::new();
        write_records(&mut buffer, &sample()).unwrap();
        let loaded = read_records(buffer.as_slice()).unwrap();
        assert_eq!(loaded, sample());
    }

    #[test]
    fn test_corrupt_row_reports_line() {
        let text = "{\"locale\":\"DE\",\"next_item_prediction\":[]}\n\nnot json\n";
        let err = read_records(text.as_bytes()).unwrap_err();
        assert!(matches!(err, SnapshotError::Corrupt { line: 3, .. }));
    }

    #[test]
    fn test_missing_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_snapshot(&dir.path().join("missing.jsonl")).unwrap_err();
        assert!(matches!(err, SnapshotError::NotFound { .. }));
    }

    #[test]
    fn test_save_creates_parent_dirs_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("recall.jsonl");

        save_snapshot(&path, &sample()).unwrap();
        save_snapshot(&path, &sample()[..1]).unwrap();

        assert_eq!(load_snapshot(&path).unwrap(), sample()[..1].to_vec());
    }
}
