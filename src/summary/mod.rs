//! Period aggregation: revenue/expense summaries with per-source attribution

pub mod engine;

pub use engine::*;
