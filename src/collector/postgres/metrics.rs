//! Storage metrics estimation.
//!
//! Combines physical relation size with the live/dead tuple statistics kept
//! by the statistics collector. Tables that have never been analyzed are kept
//! visible through the outer join, with zero counts.

use super::connection;
use crate::collector::helpers::RowExt;
use crate::models::{CollectionMetrics, DataContainer};
use crate::{Result, error::SupplyError};

/// Storage statistics query.
///
/// `pg_stat_user_tables` only has rows for tables the statistics collector
/// has seen, so the join is an outer join and both counts are coalesced to
/// zero. Views carry no heap and are excluded via `table_type`.
const METRICS_QUERY: &str = r#"
    SELECT
        t.table_schema,
        t.table_name,
        pg_relation_size(
            (quote_ident(t.table_schema) || '.' || quote_ident(t.table_name))::regclass
        ) AS total_bytes,
        COALESCE(s.n_live_tup, 0)::bigint AS live_rows,
        COALESCE(s.n_dead_tup, 0)::bigint AS dead_rows
    FROM information_schema.tables t
    LEFT OUTER JOIN pg_stat_user_tables s
      ON s.schemaname = t.table_schema
     AND s.relname = t.table_name
    WHERE t.table_schema NOT IN ('pg_catalog', 'information_schema')
      AND t.table_type = 'BASE TABLE'
    ORDER BY t.table_schema, t.table_name
"#;

/// Computes a fresh storage snapshot for every user table in the container.
pub(crate) async fn get_collection_metrics(
    container: &DataContainer,
) -> Result<Vec<CollectionMetrics>> {
    tracing::debug!("computing collection metrics for {container}");

    let mut conn = connection::open(container).await?;
    let result = sqlx::query(METRICS_QUERY).fetch_all(&mut conn).await;
    connection::release(conn).await;

    let rows = result.map_err(|e| {
        SupplyError::query_failed(format!("metrics collection failed for {container}"), e)
    })?;

    let mut metrics = Vec::with_capacity(rows.len());
    for row in &rows {
        let schema: String = row.get_field("table_schema", None)?;
        let name: String = row.get_field("table_name", None)?;
        let total_bytes: i64 = row.get_field("total_bytes", Some(&name))?;
        let live_rows: i64 = row.get_field("live_rows", Some(&name))?;
        let dead_rows: i64 = row.get_field("dead_rows", Some(&name))?;

        metrics.push(CollectionMetrics::from_tuple_stats(
            schema, name, total_bytes, live_rows, dead_rows,
        ));
    }

    tracing::info!("computed metrics for {} collections in {container}", metrics.len());
    Ok(metrics)
}
