//! Helper utilities shared by collector implementations.

use crate::{Result, error::SupplyError};
use sqlx::{Row, postgres::PgRow};

/// Extension trait for extracting typed values from database rows with
/// consistent error handling.
///
/// Decode failures surface as [`SupplyError::DataShape`] with field and table
/// context, distinguishing malformed catalog results from query failures.
pub(crate) trait RowExt {
    /// Extracts a typed field from the row with proper error context.
    ///
    /// # Arguments
    /// * `field_name` - Name of the column to extract
    /// * `table_context` - Optional table name for error messages
    fn get_field<'r, T>(&'r self, field_name: &str, table_context: Option<&str>) -> Result<T>
    where
        T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>;
}

impl RowExt for PgRow {
    fn get_field<'r, T>(&'r self, field_name: &str, table_context: Option<&str>) -> Result<T>
    where
        T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
    {
        self.try_get(field_name)
            .map_err(|e| SupplyError::data_shape(field_name, table_context, e))
    }
}

/// Quotes an identifier for interpolation into a generated query.
///
/// Embedded double quotes are doubled per SQL quoting rules. Identifiers
/// cannot be bound as parameters, so every schema, table, and column name
/// that reaches a generated query goes through here.
pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
