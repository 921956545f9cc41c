//! # Recall Orchestrator
//!
//! Runs the whole batch in one pass:
//! 1. Load training and test sessions
//! 2. Build the transition table (training first, then test)
//! 3. Rank per-item successors and the global fallback list
//! 4. Predict candidates for every test session
//! 5. Save the prediction snapshot
//!
//! There is no checkpointing. A failed run is simply re-run from scratch.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::{info, instrument, warn};

use data_loader::SessionData;
use pipeline::{Prediction, PredictionBranch, Predictor};
use recall::{BuildStats, RecallConfig, RecallIndex, TransitionTable};
use snapshot::PredictionRecord;

/// Counters describing one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub train_sessions: usize,
    pub test_sessions: usize,
    pub source_items: usize,
    pub transitions: u64,
    pub empty_sessions: usize,
    pub fallback_items: usize,
    pub fallback_only: usize,
    pub truncated: usize,
    pub backfilled: usize,
    /// Predictions that ended up below the configured size
    pub short_predictions: usize,
    pub elapsed: Duration,
}

impl RunSummary {
    fn record_build(&mut self, stats: &BuildStats, source_items: usize) {
        self.train_sessions = stats.train_sessions;
        self.test_sessions = stats.test_sessions;
        self.transitions = stats.total_transitions();
        self.empty_sessions = stats.empty_sessions;
        self.source_items = source_items;
    }

    fn record_predictions(&mut self, predictions: &[Prediction], size: usize) {
        for prediction in predictions {
            match prediction.branch {
                PredictionBranch::FallbackOnly => self.fallback_only += 1,
                PredictionBranch::Truncated => self.truncated += 1,
                PredictionBranch::Backfilled => self.backfilled += 1,
            }
            if prediction.is_short(size) {
                self.short_predictions += 1;
            }
        }
    }
}

/// Output of an in-memory run
#[derive(Debug, Clone)]
pub struct RecallRun {
    pub records: Vec<PredictionRecord>,
    pub summary: RunSummary,
}

/// Main orchestrator that coordinates the recall batch
#[derive(Debug, Clone, Default)]
pub struct RecallOrchestrator {
    config: RecallConfig,
}

impl RecallOrchestrator {
    pub fn new(config: RecallConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RecallConfig {
        &self.config
    }

    /// Full batch from CSV files to a snapshot on disk
    pub fn run(&self, train_path: &Path, test_path: &Path, output_path: &Path) -> Result<RunSummary> {
        let start_time = Instant::now();

        let data = SessionData::load_from_files(train_path, test_path)
            .context("Failed to load session files")?;

        let run = self.run_on_sessions(&data)?;

        snapshot::save_snapshot(output_path, &run.records)
            .with_context(|| format!("Failed to write snapshot {}", output_path.display()))?;

        let mut summary = run.summary;
        summary.elapsed = start_time.elapsed();
        info!(
            "Recall run finished in {:.2?}: {} predictions written to {}",
            summary.elapsed,
            run.records.len(),
            output_path.display()
        );
        Ok(summary)
    }

    /// Build, rank and predict for sessions already in memory
    pub fn run_on_sessions(&self, data: &SessionData) -> Result<RecallRun> {
        let start_time = Instant::now();
        let mut summary = RunSummary::default();

        let (table, index) = self.build_index(data);
        summary.record_build(table.stats(), table.source_count());
        summary.fallback_items = index.fallback().len();
        // The predictor only needs the ranked lists
        drop(table);

        let predictions = self.predict(index, data)?;
        summary.record_predictions(&predictions, self.config.prediction_size);
        self.log_prediction_summary(&summary);

        let records = predictions
            .into_iter()
            .map(|p| PredictionRecord::new(p.locale, p.items))
            .collect();

        summary.elapsed = start_time.elapsed();
        Ok(RecallRun { records, summary })
    }

    /// Build the transition table and rank it
    pub fn build_index(&self, data: &SessionData) -> (TransitionTable, RecallIndex) {
        let table = TransitionTable::from_sessions(data);
        let index = RecallIndex::build(&table, &self.config);
        (table, index)
    }

    #[instrument(skip(self, index, data))]
    fn predict(&self, index: RecallIndex, data: &SessionData) -> Result<Vec<Prediction>> {
        let start = Instant::now();
        let predictor = Predictor::new(Arc::new(index), &self.config);
        let predictions = predictor
            .predict_all(data.test_sessions())
            .context("Failed to predict test sessions")?;
        info!(
            "Predicted {} test sessions in {:.2?}",
            predictions.len(),
            start.elapsed()
        );
        Ok(predictions)
    }

    fn log_prediction_summary(&self, summary: &RunSummary) {
        info!(
            "Prediction branches: fallback_only={}, truncated={}, backfilled={}",
            summary.fallback_only, summary.truncated, summary.backfilled
        );
        if summary.short_predictions > 0 {
            warn!(
                "{} predictions have fewer than {} candidates (fallback list exhausted)",
                summary.short_predictions, self.config.prediction_size
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    // ============================================================================
    // Test Fixtures
    // ============================================================================

    const TRAIN_CSV: &str = "prev_items,next_item,locale\n\
        \"['X' 'A']\",B,DE\n\
        ['X'],A,DE\n\
        \"['Y' 'X'\n 'C']\",D,JP\n\
        [],E,UK\n";

    const TEST_CSV: &str = "prev_items,locale\n\
        \"['Q' 'X']\",DE\n\
        ['NEW'],JP\n\
        ['C'],UK\n";

    fn write_inputs(dir: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
        let train = dir.join("sessions_train.csv");
        let test = dir.join("sessions_test.csv");
        fs::write(&train, TRAIN_CSV).unwrap();
        fs::write(&test, TEST_CSV).unwrap();
        (train, test)
    }

    // ============================================================================
    // Tests
    // ============================================================================

    #[test]
    fn test_run_writes_one_row_per_test_session() {
        let dir = tempfile::tempdir().unwrap();
        let (train, test) = write_inputs(dir.path());
        let output = dir.path().join("out").join("recall.jsonl");

        let summary = RecallOrchestrator::default().run(&train, &test, &output).unwrap();
        let records = snapshot::load_snapshot(&output).unwrap();

        assert_eq!(records.len(), 3);
        let locales: Vec<&str> = records.iter().map(|r| r.locale.as_str()).collect();
        assert_eq!(locales, vec!["DE", "JP", "UK"]);

        assert_eq!(summary.train_sessions, 4);
        assert_eq!(summary.test_sessions, 3);
        assert_eq!(summary.empty_sessions, 1);
        // train: 2 + 1 + 3, test: 1
        assert_eq!(summary.transitions, 7);
    }

    #[test]
    fn test_run_predictions_follow_rules() {
        let dir = tempfile::tempdir().unwrap();
        let (train, test) = write_inputs(dir.path());
        let data = SessionData::load_from_files(&train, &test).unwrap();

        let run = RecallOrchestrator::default().run_on_sessions(&data).unwrap();
        let records = &run.records;

        // X is followed by A twice and C once
        assert_eq!(records[0].next_item_prediction[..2], ["A".to_string(), "C".to_string()]);
        // Q and X are part of the session and never backfilled
        assert!(!records[0].next_item_prediction.contains(&"Q".to_string()));
        assert!(!records[0].next_item_prediction.contains(&"X".to_string()));

        // NEW was never a source: the fallback list as-is
        assert_eq!(records[1].next_item_prediction[0], "A");

        // Tiny corpus: every prediction is short, and counted as such
        assert_eq!(run.summary.short_predictions, 3);
        assert_eq!(run.summary.fallback_only, 1);
        assert_eq!(run.summary.backfilled, 2);
    }

    #[test]
    fn test_runs_are_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let (train, test) = write_inputs(dir.path());
        let first = dir.path().join("first.jsonl");
        let second = dir.path().join("second.jsonl");

        let orchestrator = RecallOrchestrator::default();
        orchestrator.run(&train, &test, &first).unwrap();
        orchestrator.run(&train, &test, &second).unwrap();

        assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
    }

    #[test]
    fn test_missing_input_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = RecallOrchestrator::default().run(
            &dir.path().join("missing_train.csv"),
            &dir.path().join("missing_test.csv"),
            &dir.path().join("out.jsonl"),
        );
        assert!(result.is_err());
        assert!(!dir.path().join("out.jsonl").exists());
    }
}
