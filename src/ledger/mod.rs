//! Ledger module containing manual entry management and line presentation

pub mod entries;
pub mod lines;

pub use entries::*;
pub use lines::*;
