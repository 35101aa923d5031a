//! Faceting: value summaries used to build filter inputs.
//!
//! Facets are computed over rows that pass every filter except the column's
//! own, so a select input keeps offering values the user can switch to.

use std::cmp::Ordering;

use super::Table;
use crate::model::Value;

impl<T> Table<T> {
    /// Distinct non-null values of a column with their row counts, sorted.
    ///
    /// Returns an empty list for unknown or accessor-less columns.
    pub fn faceted_unique_values(&self, column: &str) -> Vec<(Value, usize)> {
        let Some(col) = self.column(column).filter(|c| c.has_accessor()) else {
            return Vec::new();
        };

        let mut values: Vec<Value> = self
            .filter_indices(Some(column))
            .into_iter()
            .map(|i| col.value(&self.rows[i]))
            .filter(|v| !v.is_null())
            .collect();
        values.sort_by(|a, b| a.natural_cmp(b));

        let mut facets: Vec<(Value, usize)> = Vec::new();
        for value in values {
            match facets.last_mut() {
                Some((last, count)) if last.natural_cmp(&value) == Ordering::Equal => *count += 1,
                _ => facets.push((value, 1)),
            }
        }
        facets
    }

    /// Smallest and largest non-null value of a column.
    pub fn faceted_min_max(&self, column: &str) -> Option<(Value, Value)> {
        let col = self.column(column).filter(|c| c.has_accessor())?;

        self.filter_indices(Some(column))
            .into_iter()
            .map(|i| col.value(&self.rows[i]))
            .filter(|v| !v.is_null())
            .fold(None, |acc, value| match acc {
                None => Some((value.clone(), value)),
                Some((min, max)) => {
                    let min = if value.natural_cmp(&min) == Ordering::Less { value.clone() } else { min };
                    let max = if value.natural_cmp(&max) == Ordering::Greater { value } else { max };
                    Some((min, max))
                }
            })
    }
}
