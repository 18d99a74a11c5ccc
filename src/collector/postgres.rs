//! PostgreSQL supply collector.
//!
//! # Module Structure
//! - `connection`: per-call connection gateway and URL parsing
//! - `type_mapping`: native type name to canonical type conversion
//! - `schema`: catalog query and streaming group-by discovery
//! - `metrics`: relation size and live/dead tuple statistics
//! - `sampling`: single-column value sampling with array flattening
//!
//! # Guarantees
//! - All operations are read-only
//! - Each operation opens its own connection and releases it before returning
//! - Credentials never appear in errors or logs

mod connection;
mod metrics;
mod sampling;
mod schema;
mod type_mapping;

#[cfg(test)]
mod tests;

use super::SupplyCollector;
use crate::Result;
use crate::models::{CollectionMetrics, DataCollection, DataContainer, DataEntity};
use async_trait::async_trait;

pub use connection::parse_container_url;
pub use type_mapping::map_native_type;

/// Stateless PostgreSQL implementation of [`SupplyCollector`].
///
/// Holds no connection or cache; every call connects, streams its result,
/// and disconnects. Safe to share across concurrent callers.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresCollector;

impl PostgresCollector {
    /// Creates a new collector.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SupplyCollector for PostgresCollector {
    fn data_store_types(&self) -> Vec<String> {
        vec!["PostgreSQL".to_string()]
    }

    async fn test_connection(&self, container: &DataContainer) -> bool {
        connection::test_connection(container).await
    }

    async fn get_schema(
        &self,
        container: &DataContainer,
    ) -> Result<(Vec<DataCollection>, Vec<DataEntity>)> {
        schema::get_schema(container).await
    }

    async fn get_collection_metrics(
        &self,
        container: &DataContainer,
    ) -> Result<Vec<CollectionMetrics>> {
        metrics::get_collection_metrics(container).await
    }

    async fn collect_sample(&self, entity: &DataEntity, sample_size: u32) -> Result<Vec<String>> {
        sampling::collect_sample(entity, sample_size).await
    }
}
