//! PostgreSQL supply collector for the data-discovery platform.
//!
//! This crate introspects a live PostgreSQL database and reports what it
//! finds in the platform's engine-agnostic vocabulary: collections (tables),
//! entities (columns) with constraint-derived flags, per-collection storage
//! metrics split into used and unused space, and per-entity value samples.
//!
//! # Security Guarantees
//! - Credentials never appear in error messages, logs, or `Debug` output
//! - All database operations are read-only
//! - Each operation opens its own connection and releases it before returning
//!
//! # Example
//! ```rust,no_run
//! use pg_supply_collector::{PostgresCollector, SupplyCollector, parse_container_url};
//!
//! # async fn example() -> pg_supply_collector::Result<()> {
//! let container = parse_container_url("postgres://reader@db.internal/crm")?;
//! let collector = PostgresCollector::new();
//!
//! if collector.test_connection(&container).await {
//!     let (collections, entities) = collector.get_schema(&container).await?;
//!     println!("{} collections, {} entities", collections.len(), entities.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod collector;
pub mod error;
pub mod logging;
pub mod models;

// Re-export commonly used types
pub use collector::SupplyCollector;
pub use collector::postgres::{PostgresCollector, map_native_type, parse_container_url};
pub use error::{Result, SupplyError, redact_database_url};
pub use logging::init_logging;
pub use models::{
    CanonicalType, CollectionMetrics, DataCollection, DataContainer, DataEntity,
};
