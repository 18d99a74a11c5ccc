//! Column value sampling.
//!
//! Reads up to N values of one column and renders each to its canonical
//! string form. A multi-valued (array) cell flattens to a single comma-joined
//! string per row rather than expanding into separate rows: sampling
//! characterizes what one value of the column looks like, and expansion would
//! break the row-count parity that co-sampling of sibling columns relies on.

use super::connection;
use crate::collector::helpers::{RowExt, quote_ident};
use crate::models::DataEntity;
use crate::{Result, error::SupplyError};

/// Builds the sample query for an entity.
///
/// Array columns render server-side with `array_to_string` so every element
/// type flattens uniformly; scalar columns cast to text. Identifiers are
/// quote-escaped and the limit is bound as a parameter.
pub(crate) fn sample_query(entity: &DataEntity) -> String {
    let column = quote_ident(&entity.name);
    let projection = if entity.is_multi_valued() {
        format!("array_to_string({column}, ',')")
    } else {
        format!("{column}::text")
    };
    format!(
        "SELECT {projection} AS sample_value FROM {}.{} LIMIT $1",
        quote_ident(&entity.collection.schema),
        quote_ident(&entity.collection.name),
    )
}

/// Reads up to `sample_size` values of the entity's column.
///
/// Returns exactly `min(sample_size, row_count)` strings: each table row
/// contributes one string, with SQL NULL rendered as the empty string to
/// preserve row parity. An empty table yields an empty list.
pub(crate) async fn collect_sample(entity: &DataEntity, sample_size: u32) -> Result<Vec<String>> {
    let query = sample_query(entity);
    tracing::debug!(
        "sampling up to {sample_size} values of {}.{}",
        entity.collection,
        entity.name
    );

    let mut conn = connection::open(&entity.collection.container).await?;
    let result = sqlx::query(&query)
        .bind(i64::from(sample_size))
        .fetch_all(&mut conn)
        .await;
    connection::release(conn).await;

    let rows = result.map_err(|e| {
        SupplyError::query_failed(
            format!("sampling failed for {}.{}", entity.collection, entity.name),
            e,
        )
    })?;

    let mut samples = Vec::with_capacity(rows.len());
    for row in &rows {
        let value: Option<String> = row.get_field("sample_value", Some(&entity.collection.name))?;
        samples.push(value.unwrap_or_default());
    }

    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CanonicalType, DataCollection, DataContainer};

    fn entity(name: &str, db_data_type: &str) -> DataEntity {
        DataEntity {
            name: name.to_string(),
            db_data_type: db_data_type.to_string(),
            data_type: CanonicalType::Unknown,
            is_auto_number: false,
            is_computed: false,
            is_nullable: true,
            is_primary_key: false,
            is_unique_key: false,
            is_foreign_key: false,
            is_indexed: false,
            collection: DataCollection {
                schema: "public".to_string(),
                name: "test_index".to_string(),
                container: DataContainer::new("localhost".to_string()),
            },
        }
    }

    #[test]
    fn test_sample_query_scalar_column() {
        let query = sample_query(&entity("name", "text"));
        assert_eq!(
            query,
            "SELECT \"name\"::text AS sample_value FROM \"public\".\"test_index\" LIMIT $1"
        );
    }

    #[test]
    fn test_sample_query_array_column_flattens_per_row() {
        let query = sample_query(&entity("int_array", "ARRAY"));
        assert_eq!(
            query,
            "SELECT array_to_string(\"int_array\", ',') AS sample_value \
             FROM \"public\".\"test_index\" LIMIT $1"
        );
    }

    #[test]
    fn test_sample_query_bracket_suffix_array() {
        let query = sample_query(&entity("tags", "text[]"));
        assert!(query.starts_with("SELECT array_to_string(\"tags\", ',')"));
    }

    #[test]
    fn test_sample_query_quotes_identifiers() {
        let mut e = entity("select", "text");
        e.collection.schema = "odd schema".to_string();
        let query = sample_query(&e);
        assert!(query.contains("\"select\"::text"));
        assert!(query.contains("FROM \"odd schema\".\"test_index\""));
    }
}
