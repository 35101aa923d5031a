//! Column filter types.

use std::cmp::Ordering;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::model::Value;

/// How a text filter compares against a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextMatch {
    /// Case-insensitive substring match.
    #[default]
    Contains,
    /// Exact, case-sensitive match against the display text.
    Exact,
}

/// A filter applied to a single column.
///
/// Every variant has an "empty" form (blank text, a range with no bounds, an
/// empty set) which imposes no constraint, so a UI can keep a filter around
/// while its input is cleared.
///
/// # Example
///
/// ```
/// use datagrid_lib::table::ColumnFilter;
/// use datagrid_lib::Value;
///
/// let level = ColumnFilter::range(Some(2.0), Some(5.0));
/// assert!(level.matches(&Value::from(5i64)));
/// assert!(!level.matches(&Value::from(6i64)));
///
/// let segment = ColumnFilter::one_of(["whale", "shark"]);
/// assert!(segment.matches(&Value::from("shark")));
///
/// assert!(ColumnFilter::contains("").is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnFilter {
    /// Text match against the cell's display text.
    Text { value: String, mode: TextMatch },
    /// Inclusive numeric range. A missing bound is open.
    NumberRange { min: Option<f64>, max: Option<f64> },
    /// Inclusive date range. A missing bound is open.
    DateRange {
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    },
    /// Set membership (multi-select checkboxes).
    OneOf(Vec<Value>),
}

impl ColumnFilter {
    /// Creates a case-insensitive substring filter.
    pub fn contains(value: impl Into<String>) -> Self {
        ColumnFilter::Text {
            value: value.into(),
            mode: TextMatch::Contains,
        }
    }

    /// Creates an exact text filter.
    pub fn exact(value: impl Into<String>) -> Self {
        ColumnFilter::Text {
            value: value.into(),
            mode: TextMatch::Exact,
        }
    }

    /// Creates an inclusive numeric range filter.
    pub fn range(min: Option<f64>, max: Option<f64>) -> Self {
        ColumnFilter::NumberRange { min, max }
    }

    /// Creates an inclusive date range filter.
    pub fn date_range(from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Self {
        ColumnFilter::DateRange { from, to }
    }

    /// Creates a set-membership filter.
    pub fn one_of<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Self {
        ColumnFilter::OneOf(values.into_iter().map(Into::into).collect())
    }

    /// Returns `true` if this filter imposes no constraint.
    pub fn is_empty(&self) -> bool {
        match self {
            ColumnFilter::Text { value, .. } => value.is_empty(),
            ColumnFilter::NumberRange { min, max } => min.is_none() && max.is_none(),
            ColumnFilter::DateRange { from, to } => from.is_none() && to.is_none(),
            ColumnFilter::OneOf(values) => values.is_empty(),
        }
    }

    /// Tests a cell value against this filter.
    ///
    /// Values of the wrong kind (a string under a numeric range, `Null` under
    /// anything) never match a non-empty filter.
    pub fn matches(&self, value: &Value) -> bool {
        if self.is_empty() {
            return true;
        }

        match self {
            ColumnFilter::Text { value: needle, mode } => {
                if value.is_null() {
                    return false;
                }
                let haystack = value.to_search_string();
                match mode {
                    TextMatch::Contains => haystack.to_lowercase().contains(&needle.to_lowercase()),
                    TextMatch::Exact => haystack == *needle,
                }
            }
            ColumnFilter::NumberRange { min, max } => {
                let Some(n) = value.as_f64() else {
                    return false;
                };
                min.is_none_or(|min| n >= min) && max.is_none_or(|max| n <= max)
            }
            ColumnFilter::DateRange { from, to } => {
                let Some(dt) = value.as_datetime() else {
                    return false;
                };
                from.is_none_or(|from| dt >= from) && to.is_none_or(|to| dt <= to)
            }
            ColumnFilter::OneOf(values) => values
                .iter()
                .any(|candidate| candidate.natural_cmp(value) == Ordering::Equal),
        }
    }
}
