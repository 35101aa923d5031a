//! JSON encoding.

use serde_json::Map;

use crate::column::Column;
use crate::error::ExportError;

/// Array of objects keyed by column id, keys in column order.
pub(super) fn encode<T>(rows: &[&T], columns: &[&Column<T>]) -> Result<Vec<u8>, ExportError> {
    let records: Vec<serde_json::Value> = rows
        .iter()
        .map(|row| {
            let object: Map<String, serde_json::Value> = columns
                .iter()
                .map(|column| (column.id().to_string(), column.value(row).to_json()))
                .collect();
            serde_json::Value::Object(object)
        })
        .collect();

    Ok(serde_json::to_vec_pretty(&records)?)
}
