//! Schema discovery.
//!
//! One catalog query returns every user-schema column in
//! (schema, table, ordinal) order along with three independently computed
//! constraint counts. A streaming fold with an explicit current-group key
//! turns the ordered rows into collections and entities.

use super::{connection, type_mapping};
use crate::collector::helpers::RowExt;
use crate::models::{DataCollection, DataContainer, DataEntity};
use crate::{Result, error::SupplyError};
use sqlx::postgres::PgRow;

/// Catalog query for schema discovery.
///
/// The three constraint subqueries count, per column, how many PRIMARY KEY,
/// UNIQUE, and FOREIGN KEY constraints reference it; each count collapses to
/// a boolean client-side. Ordering by (schema, table, ordinal position) is
/// explicit because the group-by fold depends on it.
const SCHEMA_QUERY: &str = r#"
    SELECT
        c.table_schema,
        c.table_name,
        c.column_name,
        c.data_type,
        c.is_nullable,
        c.is_generated,
        c.is_identity,
        (SELECT count(*)
           FROM information_schema.constraint_column_usage ccu
           JOIN information_schema.table_constraints tc
             ON ccu.constraint_name = tc.constraint_name
            AND ccu.constraint_schema = tc.constraint_schema
            AND tc.constraint_type = 'PRIMARY KEY'
          WHERE ccu.table_schema = c.table_schema
            AND ccu.table_name = c.table_name
            AND ccu.column_name = c.column_name
        ) AS primary_key_refs,
        (SELECT count(*)
           FROM information_schema.constraint_column_usage ccu
           JOIN information_schema.table_constraints tc
             ON ccu.constraint_name = tc.constraint_name
            AND ccu.constraint_schema = tc.constraint_schema
            AND tc.constraint_type = 'UNIQUE'
          WHERE ccu.table_schema = c.table_schema
            AND ccu.table_name = c.table_name
            AND ccu.column_name = c.column_name
        ) AS unique_refs,
        (SELECT count(*)
           FROM information_schema.key_column_usage kcu
           JOIN information_schema.table_constraints tc
             ON kcu.constraint_name = tc.constraint_name
            AND kcu.constraint_schema = tc.constraint_schema
            AND tc.constraint_type = 'FOREIGN KEY'
          WHERE kcu.table_schema = c.table_schema
            AND kcu.table_name = c.table_name
            AND kcu.column_name = c.column_name
        ) AS foreign_key_refs
    FROM information_schema.columns c
    WHERE c.table_schema NOT IN ('pg_catalog', 'information_schema')
    ORDER BY c.table_schema, c.table_name, c.ordinal_position
"#;

/// One decoded row of the catalog query.
#[derive(Debug, Clone)]
pub(crate) struct CatalogRow {
    pub(crate) schema: String,
    pub(crate) table: String,
    pub(crate) column: String,
    pub(crate) data_type: String,
    pub(crate) is_nullable: bool,
    pub(crate) is_computed: bool,
    pub(crate) is_auto_number: bool,
    pub(crate) is_primary_key: bool,
    pub(crate) is_unique_key: bool,
    pub(crate) is_foreign_key: bool,
}

fn decode_catalog_row(row: &PgRow) -> Result<CatalogRow> {
    let schema: String = row.get_field("table_schema", None)?;
    let table: String = row.get_field("table_name", None)?;
    let column: String = row.get_field("column_name", Some(&table))?;
    let data_type: String = row.get_field("data_type", Some(&table))?;
    let is_nullable: String = row.get_field("is_nullable", Some(&table))?;
    let is_generated: String = row.get_field("is_generated", Some(&table))?;
    let is_identity: String = row.get_field("is_identity", Some(&table))?;
    let primary_key_refs: i64 = row.get_field("primary_key_refs", Some(&table))?;
    let unique_refs: i64 = row.get_field("unique_refs", Some(&table))?;
    let foreign_key_refs: i64 = row.get_field("foreign_key_refs", Some(&table))?;

    Ok(CatalogRow {
        schema,
        table,
        column,
        data_type,
        is_nullable: is_nullable.eq_ignore_ascii_case("yes"),
        // information_schema reports generated columns as ALWAYS/NEVER
        is_computed: is_generated.eq_ignore_ascii_case("always"),
        is_auto_number: is_identity.eq_ignore_ascii_case("yes"),
        is_primary_key: primary_key_refs > 0,
        is_unique_key: unique_refs > 0,
        is_foreign_key: foreign_key_refs > 0,
    })
}

/// Folds ordered catalog rows into collections and entities.
///
/// A new collection opens whenever the (schema, table) pair differs from the
/// current group key; every row becomes one entity attached to the current
/// collection. Input order is preserved in both output lists.
pub(crate) fn group_catalog_rows(
    container: &DataContainer,
    rows: Vec<CatalogRow>,
) -> (Vec<DataCollection>, Vec<DataEntity>) {
    let mut collections: Vec<DataCollection> = Vec::new();
    let mut entities: Vec<DataEntity> = Vec::new();
    let mut current: Option<DataCollection> = None;

    for row in rows {
        let starts_new_group = match &current {
            None => true,
            Some(c) => c.schema != row.schema || c.name != row.table,
        };
        if starts_new_group {
            let collection = DataCollection {
                schema: row.schema.clone(),
                name: row.table.clone(),
                container: container.clone(),
            };
            collections.push(collection.clone());
            current = Some(collection);
        }

        if let Some(collection) = &current {
            entities.push(DataEntity {
                name: row.column,
                data_type: type_mapping::map_native_type(&row.data_type),
                db_data_type: row.data_type,
                is_auto_number: row.is_auto_number,
                is_computed: row.is_computed,
                is_nullable: row.is_nullable,
                is_primary_key: row.is_primary_key,
                is_unique_key: row.is_unique_key,
                is_foreign_key: row.is_foreign_key,
                is_indexed: row.is_primary_key || row.is_foreign_key,
                collection: collection.clone(),
            });
        }
    }

    (collections, entities)
}

/// Discovers every collection and entity in the container's user schemas.
pub(crate) async fn get_schema(
    container: &DataContainer,
) -> Result<(Vec<DataCollection>, Vec<DataEntity>)> {
    tracing::debug!("starting schema discovery for {container}");

    let mut conn = connection::open(container).await?;
    let result = sqlx::query(SCHEMA_QUERY).fetch_all(&mut conn).await;
    connection::release(conn).await;

    let rows = result
        .map_err(|e| SupplyError::query_failed(format!("schema discovery failed for {container}"), e))?;
    let catalog_rows = rows
        .iter()
        .map(decode_catalog_row)
        .collect::<Result<Vec<_>>>()?;

    let (collections, entities) = group_catalog_rows(container, catalog_rows);

    tracing::info!(
        "discovered {} collections and {} entities in {container}",
        collections.len(),
        entities.len()
    );

    Ok((collections, entities))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CanonicalType;

    fn container() -> DataContainer {
        DataContainer::new("localhost".to_string()).with_database("postgres".to_string())
    }

    fn row(schema: &str, table: &str, column: &str, data_type: &str) -> CatalogRow {
        CatalogRow {
            schema: schema.to_string(),
            table: table.to_string(),
            column: column.to_string(),
            data_type: data_type.to_string(),
            is_nullable: true,
            is_computed: false,
            is_auto_number: false,
            is_primary_key: false,
            is_unique_key: false,
            is_foreign_key: false,
        }
    }

    #[test]
    fn test_group_rows_one_collection_per_table() {
        let rows = vec![
            row("public", "email", "id", "integer"),
            row("public", "email", "to_addrs_emails", "text"),
            row("public", "leads", "id", "integer"),
            row("public", "leads", "converted", "boolean"),
            row("public", "leads", "created_at", "timestamp without time zone"),
        ];

        let (collections, entities) = group_catalog_rows(&container(), rows);

        assert_eq!(collections.len(), 2);
        assert_eq!(entities.len(), 5);
        assert_eq!(collections[0].to_string(), "public.email");
        assert_eq!(collections[1].to_string(), "public.leads");
        assert_eq!(entities[0].collection.name, "email");
        assert_eq!(entities[2].collection.name, "leads");
        assert_eq!(entities[4].collection.name, "leads");
    }

    #[test]
    fn test_group_rows_same_table_name_across_schemas() {
        let rows = vec![
            row("app", "users", "id", "integer"),
            row("audit", "users", "id", "integer"),
        ];

        let (collections, entities) = group_catalog_rows(&container(), rows);

        // Same relation name in two schemas is two distinct collections.
        assert_eq!(collections.len(), 2);
        assert_eq!(entities[0].collection.schema, "app");
        assert_eq!(entities[1].collection.schema, "audit");
    }

    #[test]
    fn test_group_rows_preserves_catalog_order() {
        let rows = vec![
            row("public", "a", "x", "text"),
            row("public", "b", "x", "text"),
            row("public", "c", "x", "text"),
        ];

        let (collections, _) = group_catalog_rows(&container(), rows);
        let names: Vec<&str> = collections.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_group_rows_empty_input() {
        let (collections, entities) = group_catalog_rows(&container(), Vec::new());
        assert!(collections.is_empty());
        assert!(entities.is_empty());
    }

    #[test]
    fn test_primary_key_column_is_indexed() {
        let mut pk = row("public", "leads", "id", "integer");
        pk.is_primary_key = true;

        let (_, entities) = group_catalog_rows(&container(), vec![pk]);
        assert!(entities[0].is_primary_key);
        assert!(entities[0].is_indexed);
    }

    #[test]
    fn test_foreign_key_column_is_indexed() {
        let mut fk = row("public", "email", "lead_id", "integer");
        fk.is_foreign_key = true;

        let (_, entities) = group_catalog_rows(&container(), vec![fk]);
        assert!(entities[0].is_foreign_key);
        assert!(entities[0].is_indexed);
        assert!(!entities[0].is_primary_key);
    }

    #[test]
    fn test_unique_only_column_is_not_indexed() {
        let mut unique = row("public", "leads", "email_addr", "text");
        unique.is_unique_key = true;

        let (_, entities) = group_catalog_rows(&container(), vec![unique]);
        assert!(entities[0].is_unique_key);
        assert!(!entities[0].is_indexed);
    }

    #[test]
    fn test_column_can_carry_all_three_constraints() {
        let mut all = row("public", "memberships", "user_id", "integer");
        all.is_primary_key = true;
        all.is_unique_key = true;
        all.is_foreign_key = true;

        let (_, entities) = group_catalog_rows(&container(), vec![all]);
        assert!(entities[0].is_primary_key);
        assert!(entities[0].is_unique_key);
        assert!(entities[0].is_foreign_key);
        assert!(entities[0].is_indexed);
    }

    #[test]
    fn test_identity_and_generated_flags_are_independent() {
        let mut identity = row("public", "orders", "id", "integer");
        identity.is_auto_number = true;
        let mut generated = row("public", "orders", "total_cents", "bigint");
        generated.is_computed = true;

        let (_, entities) = group_catalog_rows(&container(), vec![identity, generated]);

        assert!(entities[0].is_auto_number);
        assert!(!entities[0].is_computed);
        assert!(entities[1].is_computed);
        assert!(!entities[1].is_auto_number);
    }

    #[test]
    fn test_entities_keep_raw_type_and_canonical_type() {
        let rows = vec![row("public", "test_arrays", "int_array", "ARRAY")];

        let (_, entities) = group_catalog_rows(&container(), rows);
        assert_eq!(entities[0].db_data_type, "ARRAY");
        assert_eq!(entities[0].data_type, CanonicalType::Array);
        assert!(entities[0].is_multi_valued());
    }
}
