//! Loading both session files into a SessionData.

use crate::error::Result;
use crate::parser;
use crate::types::*;
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

impl SessionData {
    /// Load training and test sessions from their CSV files
    ///
    /// The two files are independent, so they are parsed in parallel with
    /// `rayon::join`. Each file's rows keep their on-disk order.
    pub fn load_from_files(train_path: &Path, test_path: &Path) -> Result<Self> {
        info!(
            "Loading sessions from {} and {}",
            train_path.display(),
            test_path.display()
        );
        let start = Instant::now();

        let (train, test) = rayon::join(
            || parser::parse_train_sessions(train_path),
            || parser::parse_test_sessions(test_path),
        );
        let train = train?;
        let test = test?;

        let data = SessionData::from_sessions(train, test);
        data.log_empty_sessions();

        let (train_count, test_count) = data.counts();
        info!(
            "Loaded {} training sessions and {} test sessions in {:.2?}",
            train_count,
            test_count,
            start.elapsed()
        );
        Ok(data)
    }

    /// Count rows whose `prev_items` produced no tokens at all
    ///
    /// Returns (empty train sessions, empty test sessions)
    pub fn empty_session_counts(&self) -> (usize, usize) {
        let train = self.train.iter().filter(|s| s.items.is_empty()).count();
        let test = self.test.iter().filter(|s| s.items.is_empty()).count();
        (train, test)
    }

    fn log_empty_sessions(&self) {
        let (train, test) = self.empty_session_counts();
        if train > 0 || test > 0 {
            warn!(
                "{} training and {} test sessions have no parseable items",
                train, test
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let train_path = dir.path().join("sessions_train.csv");
        let test_path = dir.path().join("sessions_test.csv");
        fs::write(
            &train_path,
            "prev_items,next_item,locale\n['A' 'B'],C,DE\n['B'],C,DE\n",
        )
        .unwrap();
        fs::write(&test_path, "prev_items,locale\n['A'],DE\n[],DE\n").unwrap();

        let data = SessionData::load_from_files(&train_path, &test_path).unwrap();

        assert_eq!(data.counts(), (2, 2));
        assert_eq!(data.train_sessions()[0].items, vec!["A", "B"]);
        assert_eq!(data.test_sessions()[0].last_item().map(String::as_str), Some("A"));
        assert_eq!(data.empty_session_counts(), (0, 1));
    }

    #[test]
    fn test_load_propagates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let train_path = dir.path().join("sessions_train.csv");
        fs::write(&train_path, "prev_items,next_item,locale\n").unwrap();

        let result = SessionData::load_from_files(&train_path, &dir.path().join("missing.csv"));
        assert!(result.is_err());
    }
}
