//! Filter implementations for the backfill pipeline.
//!
//! Both filters drop fallback candidates that would either repeat the
//! ranked list or point back into the session itself.

pub mod already_ranked;
pub mod already_seen;

// Re-export for convenience
pub use already_ranked::AlreadyRankedFilter;
pub use already_seen::AlreadySeenFilter;
