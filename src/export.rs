//! Flat record sets for spreadsheet-style export. Turning a table into CSV or
//! XLSX bytes is left to the caller.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Uniform rows: every row has a value for every column, in column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExportTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl ExportTable {
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Nested values are flattened to their JSON text.
fn cell(value: Value) -> Value {
    match value {
        Value::Array(_) | Value::Object(_) => Value::String(value.to_string()),
        scalar => scalar,
    }
}

/// Builds a table from records that serialize to JSON objects. Columns follow
/// field order of first appearance; a key missing from a row becomes null.
pub fn records<T: Serialize>(items: &[T]) -> Result<ExportTable> {
    let mut objects: Vec<Map<String, Value>> = Vec::with_capacity(items.len());
    let mut columns: Vec<String> = Vec::new();

    for item in items {
        let value = serde_json::to_value(item).map_err(|e| Error::Export(e.to_string()))?;
        let Value::Object(object) = value else {
            return Err(Error::Export("records must serialize to objects".to_string()));
        };
        for key in object.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
        objects.push(object);
    }

    let rows = objects
        .into_iter()
        .map(|mut object| {
            columns
                .iter()
                .map(|column| cell(object.remove(column).unwrap_or(Value::Null)))
                .collect()
        })
        .collect();

    Ok(ExportTable { columns, rows })
}

/// `prefix_YYYYMMDD_HHMMSS.ext`
#[must_use]
pub fn filename(prefix: &str, extension: &str, now: DateTime<Utc>) -> String {
    format!("{prefix}_{}.{extension}", now.format("%Y%m%d_%H%M%S"))
}
