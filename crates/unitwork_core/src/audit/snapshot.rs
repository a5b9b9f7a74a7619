//! Field-filtered entity snapshots.

use crate::schema::EntitySchema;
use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use unitwork_store::{FieldValue, Row};

#[derive(Debug, Error)]
enum SnapshotError {
    #[error("field `{field}` holds a non-scalar value")]
    UnexpectedKind { field: String },

    #[error("timestamp formatting failed: {0}")]
    Time(#[from] time::error::Format),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Renders the scalar-field snapshot of an entity row.
///
/// Only fields the schema declares as scalar are included; nested,
/// collection, and undeclared fields are omitted. A serialization
/// failure is logged and degrades to an empty string - a snapshot
/// problem must never fail the mutation being audited.
pub(crate) fn scalar_snapshot(schema: &EntitySchema, row: &Row) -> String {
    match render(schema, row) {
        Ok(snapshot) => snapshot,
        Err(error) => {
            tracing::error!(
                entity = schema.type_name(),
                error = %error,
                "audit snapshot serialization failed, recording empty snapshot"
            );
            String::new()
        }
    }
}

fn render(schema: &EntitySchema, row: &Row) -> Result<String, SnapshotError> {
    let mut object = serde_json::Map::new();
    for field in schema.fields() {
        if !field.kind().is_scalar() {
            continue;
        }
        if let Some(value) = row.get(field.name()) {
            object.insert(field.name().to_string(), json_value(field.name(), value)?);
        }
    }
    Ok(serde_json::to_string(&serde_json::Value::Object(object))?)
}

fn json_value(field: &str, value: &FieldValue) -> Result<serde_json::Value, SnapshotError> {
    use serde_json::Value;
    Ok(match value {
        FieldValue::Null => Value::Null,
        FieldValue::Bool(v) => Value::Bool(*v),
        FieldValue::Int(v) => Value::from(*v),
        // Decimals render as strings to keep them exact.
        FieldValue::Decimal(v) => Value::String(v.to_string()),
        FieldValue::Text(v) => Value::String(v.clone()),
        FieldValue::Uuid(v) => Value::String(v.to_string()),
        FieldValue::Timestamp(v) => Value::String(v.format(&Rfc3339)?),
        FieldValue::Record(_) | FieldValue::Records(_) => {
            return Err(SnapshotError::UnexpectedKind {
                field: field.to_string(),
            })
        }
    })
}
