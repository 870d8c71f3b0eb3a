//! # Clinic Core
//!
//! Domain core for a veterinary-clinic management system: period financial
//! aggregation, manual ledger management, the stock CSV boundary, and
//! realtime cache invalidation.
//!
//! ## Features
//!
//! - **Period aggregation**: revenue/expense summaries derived from service
//!   records, stock purchases, and manual entries, with per-source buckets
//! - **Manual ledger**: validated CRUD over a storage trait, with cache
//!   invalidation on every mutation
//! - **Ledger lines**: manual entries unioned with derived lines only at
//!   the presentation boundary
//! - **Change notification router**: per-resource backend channels mapped
//!   to idempotent cache invalidation, with backoff-based resubscribe
//! - **Stock CSV**: fixed-column export and error-tolerant import
//! - **Storage abstraction**: database-agnostic design with trait-based
//!   storage
//!
//! ## Quick Start
//!
//! ```rust
//! use clinic_core::{generate_summary, SourceCollections};
//! use chrono::NaiveDate;
//!
//! let sources = SourceCollections::default();
//! let summary = generate_summary(
//!     "2024-03",
//!     NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
//!     &sources,
//! )
//! .unwrap();
//! assert_eq!(summary.net_income, summary.total_revenue - summary.total_expenses);
//! ```

pub mod ledger;
pub mod realtime;
pub mod stock;
pub mod summary;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use ledger::*;
pub use realtime::*;
pub use stock::*;
pub use summary::*;
pub use traits::*;
pub use types::*;
