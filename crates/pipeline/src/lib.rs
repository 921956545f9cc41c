//! Prediction stage of the rule recall.
//!
//! This crate provides:
//! - Filter trait and implementations for backfill filtering
//! - FilterPipeline for composing filters
//! - Predictor, which turns a RecallIndex into per-session candidate lists
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::Predictor;
//! use recall::{RecallConfig, RecallIndex};
//!
//! let predictor = Predictor::new(Arc::new(index), &RecallConfig::default());
//! let predictions = predictor.predict_all(data.test_sessions())?;
//! ```

pub mod traits;
pub mod filters;
pub mod filter_pipeline;
pub mod predictor;

// Re-export main types
pub use traits::Filter;
pub use filter_pipeline::FilterPipeline;
pub use predictor::{Prediction, PredictionBranch, Predictor};
