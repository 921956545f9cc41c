//! Orchestrator crate for the session rule recall.
//!
//! This crate contains the orchestrator that runs every stage of the
//! batch: load sessions, build transitions, rank, predict, save.

pub mod orchestrator;

pub use orchestrator::{RecallOrchestrator, RecallRun, RunSummary};
