//! Supply collector trait for engine-agnostic schema discovery.
//!
//! The trait mirrors the surface the data-discovery platform consumes: a
//! health check, full-schema discovery, per-collection storage metrics, and
//! per-entity value sampling. Implementations open their own connection per
//! call and share no state between calls, so a single collector instance is
//! safe to use from concurrent tasks.

use crate::Result;
use crate::models::{CollectionMetrics, DataCollection, DataContainer, DataEntity};
use async_trait::async_trait;

pub(crate) mod helpers;
pub mod postgres;

/// Engine-agnostic collector interface.
///
/// # Object Safety
/// This trait is object-safe, allowing dynamic dispatch through
/// `Box<dyn SupplyCollector>` when the host loads collectors as plugins.
#[async_trait]
pub trait SupplyCollector: Send + Sync {
    /// Names of the data store types this collector can introspect.
    fn data_store_types(&self) -> Vec<String>;

    /// Tests reachability of the container.
    ///
    /// The only contract is a boolean: a container that cannot be reached or
    /// authenticated against reports `false`, never an error.
    async fn test_connection(&self, container: &DataContainer) -> bool;

    /// Discovers every collection and entity in the container's user schemas.
    ///
    /// Collections are returned in catalog order, one per distinct
    /// (schema, table) pair; every entity is attached to its collection.
    ///
    /// # Errors
    /// Connection and query failures propagate identifying the container.
    /// Discovery is all-or-nothing: no partial result is ever returned.
    async fn get_schema(
        &self,
        container: &DataContainer,
    ) -> Result<(Vec<DataCollection>, Vec<DataEntity>)>;

    /// Computes a fresh storage snapshot for every user table.
    ///
    /// Tables without recorded tuple statistics still appear, with zero
    /// live/dead counts.
    ///
    /// # Errors
    /// Connection and query failures propagate; no partial list is returned.
    async fn get_collection_metrics(
        &self,
        container: &DataContainer,
    ) -> Result<Vec<CollectionMetrics>>;

    /// Reads up to `sample_size` values of one entity's column.
    ///
    /// Each table row contributes exactly one string; multi-valued (array)
    /// cells are flattened to a comma-joined string per row. Returns fewer
    /// strings than requested when the table is smaller, which is success.
    ///
    /// # Errors
    /// Connection and query failures propagate; no retry is attempted.
    async fn collect_sample(&self, entity: &DataEntity, sample_size: u32) -> Result<Vec<String>>;
}
