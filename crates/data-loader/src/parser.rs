//! Parser for session CSV files.
//!
//! Two files are read:
//! - training sessions: `prev_items,next_item,locale`
//! - test sessions: `prev_items,locale`
//!
//! `prev_items` holds a list literal as written by the upstream data
//! preparation step, e.g. `['B09W9FND7K' 'B09JSPLN1M'\n 'B09M7GY217']`.
//! It is tokenized by [`parse_item_sequence`], which never fails.
//! Columns are matched by header name; extra columns are ignored.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

/// Turn a `prev_items` field into an ordered item sequence.
///
/// List punctuation (`[`, `]`, `'`) is dropped, newlines and carriage
/// returns become spaces, and the rest is split on whitespace. Garbage in
/// gives best-effort tokens out; there is no error path.
///
/// Example: `"['A' 'B'\n 'C']"` -> `["A", "B", "C"]`
pub fn parse_item_sequence(raw: &str) -> Vec<ItemId> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | '\''))
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();

    cleaned
        .split_whitespace()
        .filter(|token| !token.is_empty())
        .map(|token| token.to_string())
        .collect()
}

/// Raw CSV row of the training file
#[derive(Debug, Deserialize)]
struct TrainRow {
    prev_items: String,
    next_item: String,
    locale: String,
}

/// Raw CSV row of the test file
#[derive(Debug, Deserialize)]
struct TestRow {
    prev_items: String,
    locale: String,
}

/// Open a file, reporting a missing file as `FileNotFound`
fn open_file(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Map a row-level CSV failure to a ParseError.
///
/// `record_idx` is 0-based over data rows; it only serves as a fallback
/// when the CSV reader can't report a position.
fn row_error(file: &str, record_idx: usize, err: csv::Error) -> DataLoadError {
    let line = err
        .position()
        .map(|pos| pos.line() as usize)
        .unwrap_or(record_idx + 2);
    DataLoadError::ParseError {
        file: file.to_string(),
        line,
        reason: err.to_string(),
    }
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(reader)
}

/// Read training sessions from any CSV source
///
/// `file` only labels error messages.
pub fn read_train_sessions<R: Read>(reader: R, file: &str) -> Result<Vec<TrainSession>> {
    let mut reader = csv_reader(reader);
    reader.headers()?;

    let mut sessions = Vec::new();
    for (idx, row) in reader.deserialize::<TrainRow>().enumerate() {
        let row = row.map_err(|e| row_error(file, idx, e))?;
        sessions.push(TrainSession {
            items: parse_item_sequence(&row.prev_items),
            next_item: row.next_item,
            locale: row.locale,
        });
    }
    Ok(sessions)
}

/// Read test sessions from any CSV source
pub fn read_test_sessions<R: Read>(reader: R, file: &str) -> Result<Vec<TestSession>> {
    let mut reader = csv_reader(reader);
    reader.headers()?;

    let mut sessions = Vec::new();
    for (idx, row) in reader.deserialize::<TestRow>().enumerate() {
        let row = row.map_err(|e| row_error(file, idx, e))?;
        sessions.push(TestSession {
            items: parse_item_sequence(&row.prev_items),
            locale: row.locale,
        });
    }
    Ok(sessions)
}

/// Parse the training sessions file
pub fn parse_train_sessions(path: &Path) -> Result<Vec<TrainSession>> {
    let file = open_file(path)?;
    read_train_sessions(BufReader::new(file), &file_label(path))
}

/// Parse the test sessions file
pub fn parse_test_sessions(path: &Path) -> Result<Vec<TestSession>> {
    let file = open_file(path)?;
    read_test_sessions(BufReader::new(file), &file_label(path))
}
