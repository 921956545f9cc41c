//! Length statistics over a prediction table.
//!
//! Every row should carry exactly the configured number of candidates;
//! rows that don't are the ones worth looking at.

use crate::store::PredictionRecord;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LengthStats {
    pub rows: usize,
    pub mean: f64,
    pub min: usize,
    pub max: usize,
    /// Rows with fewer than the expected number of candidates
    pub short_rows: usize,
}

/// Summarize prediction lengths against the `expected` row size
pub fn describe_lengths(records: &[PredictionRecord], expected: usize) -> LengthStats {
    let lengths: Vec<usize> = records
        .iter()
        .map(|r| r.next_item_prediction.len())
        .collect();

    let rows = lengths.len();
    let total: usize = lengths.iter().sum();
    LengthStats {
        rows,
        mean: if rows > 0 { total as f64 / rows as f64 } else { 0.0 },
        min: lengths.iter().copied().min().unwrap_or(0),
        max: lengths.iter().copied().max().unwrap_or(0),
        short_rows: lengths.iter().filter(|&&len| len < expected).count(),
    }
}
