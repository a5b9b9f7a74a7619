//! Rows, record keys, and table references.

use crate::value::FieldValue;
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// The identity of a persisted record.
///
/// A transient entity has no key yet; the store assigns one at insert
/// time (sequential integer keys for the in-memory backend).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RecordKey {
    /// Integer key.
    Int(i64),
    /// UUID key.
    Uuid(Uuid),
    /// Text key.
    Text(String),
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Uuid(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v}"),
        }
    }
}

/// A qualified table reference (schema plus table name).
///
/// Table references come from entity metadata, never from hardcoded
/// strings at call sites.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TableRef {
    schema: String,
    name: String,
}

impl TableRef {
    /// Creates a table reference.
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
        }
    }

    /// Returns the schema name.
    #[must_use]
    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// Returns the table name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.name)
    }
}

/// A single stored row: named fields with dynamic values.
///
/// Fields are kept in a sorted map so two rows with the same content
/// compare equal regardless of insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Row {
    fields: BTreeMap<String, FieldValue>,
}

impl Row {
    /// Creates an empty row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field value, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: FieldValue) -> &mut Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// Returns a field value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Returns true if the row has a field with this name.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the row has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns a copy of this row restricted to the named columns.
    ///
    /// Columns absent from the row are carried as [`FieldValue::Null`],
    /// matching the bulk-load contract for nullable columns.
    #[must_use]
    pub fn project(&self, columns: &[String]) -> Row {
        let mut out = Row::new();
        for column in columns {
            let value = self
                .fields
                .get(column)
                .cloned()
                .unwrap_or(FieldValue::Null);
            out.set(column.clone(), value);
        }
        out
    }
}
