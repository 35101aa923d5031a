//! JSON input records and their column model.

use chrono::DateTime;
use chrono::Utc;
use datagrid_lib::Column;
use datagrid_lib::Value;
use datagrid_lib::table::ColumnFilter;
use serde_json::Map;

use crate::error::CliError;

/// One input object.
pub type Record = Map<String, serde_json::Value>;

/// Parses a JSON array of objects.
pub fn parse_records(bytes: &[u8]) -> Result<Vec<Record>, CliError> {
    let value: serde_json::Value = serde_json::from_slice(bytes)?;
    let serde_json::Value::Array(items) = value else {
        return Err(CliError::Shape(json_kind(&value)));
    };

    items
        .into_iter()
        .map(|item| match item {
            serde_json::Value::Object(record) => Ok(record),
            other => Err(CliError::Shape(json_kind(&other))),
        })
        .collect()
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Field names across all records, in first-seen order.
pub fn field_names(records: &[Record]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for record in records {
        for key in record.keys() {
            if !names.contains(key) {
                names.push(key.clone());
            }
        }
    }
    names
}

/// One column per field, reading the field as-is.
///
/// Missing fields read as null. Headers show the sort arrow, with the sort
/// position when more than one column is sorted. Date ranges also accept
/// RFC 3339 strings, since JSON has no date type.
pub fn columns(names: &[String]) -> Vec<Column<Record>> {
    names
        .iter()
        .map(|name| {
            let field = name.clone();
            let label = name.clone();
            Column::accessor(name.clone(), move |record: &Record| {
                record.get(&field).cloned().map(Value::from).unwrap_or_default()
            })
            .header_with(name.clone(), move |cx| match (cx.sort, cx.sort_index) {
                (Some(direction), Some(idx)) if idx > 0 => format!("{} {}{}", label, direction.arrow(), idx + 1),
                (Some(direction), _) => format!("{} {}", label, direction.arrow()),
                (None, _) => label.clone(),
            })
            .filter_fn(match_with_dates)
        })
        .collect()
}

fn match_with_dates(value: &Value, filter: &ColumnFilter) -> bool {
    match (filter, value) {
        (ColumnFilter::DateRange { .. }, Value::String(s)) => DateTime::parse_from_rfc3339(s)
            .map(|dt| filter.matches(&Value::DateTime(dt.with_timezone(&Utc))))
            .unwrap_or(false),
        _ => filter.matches(value),
    }
}
