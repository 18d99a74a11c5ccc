//! Native type name to canonical type conversion.

use crate::models::CanonicalType;

/// Maps a native PostgreSQL type name to the platform's canonical vocabulary.
///
/// Pure and total: unmapped names resolve to a fallback, never an error.
/// Unrecognized names that look numeric fall back to [`CanonicalType::Integer`]
/// (the integer-like default applied to unmapped types downstream); everything
/// else lands in [`CanonicalType::Unknown`]. Discovery keeps the raw native
/// name on the entity either way.
pub fn map_native_type(native_type: &str) -> CanonicalType {
    let normalized = native_type.trim().to_lowercase();
    match normalized.as_str() {
        "character varying" | "varchar" | "character" | "char" | "bpchar" | "text" | "citext"
        | "name" => CanonicalType::Text,

        "smallint" | "int2" | "integer" | "int" | "int4" | "bigint" | "int8" | "smallserial"
        | "serial" | "bigserial" => CanonicalType::Integer,

        "real" | "float4" | "double precision" | "float8" => CanonicalType::Float,

        "boolean" | "bool" => CanonicalType::Boolean,

        "timestamp without time zone" | "timestamp" | "timestamp with time zone"
        | "timestamptz" => CanonicalType::DateTime,

        "date" => CanonicalType::Date,

        "time without time zone" | "time" | "time with time zone" | "timetz" => {
            CanonicalType::Time
        }

        "bytea" => CanonicalType::Binary,

        "json" | "jsonb" => CanonicalType::Json,

        "uuid" => CanonicalType::Uuid,

        "array" => CanonicalType::Array,

        other if other.ends_with("[]") => CanonicalType::Array,

        other if looks_numeric(other) => CanonicalType::Integer,

        _ => CanonicalType::Unknown,
    }
}

/// Whether an unmapped type name is numeric-shaped.
fn looks_numeric(name: &str) -> bool {
    ["int", "serial", "numeric", "decimal", "money", "float", "double", "real"]
        .iter()
        .any(|fragment| name.contains(fragment))
}
