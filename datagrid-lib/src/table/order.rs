//! Ordering types for table sorting.

use std::cmp::Ordering;

use serde::Deserialize;
use serde::Serialize;

use crate::model::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Ascending order (A-Z, 0-9).
    Asc,
    /// Descending order (Z-A, 9-0).
    Desc,
}

impl Direction {
    /// Next step of the header click cycle: none → asc → desc → none.
    pub fn cycle(current: Option<Direction>) -> Option<Direction> {
        match current {
            None => Some(Direction::Asc),
            Some(Direction::Asc) => Some(Direction::Desc),
            Some(Direction::Desc) => None,
        }
    }

    /// Short indicator for headers.
    pub fn arrow(&self) -> &'static str {
        match self {
            Direction::Asc => "↑",
            Direction::Desc => "↓",
        }
    }
}

/// The active sort: column ids with directions, most significant first.
///
/// # Example
///
/// ```
/// use datagrid_lib::table::OrderBy;
///
/// let order = OrderBy::desc("bits_earned").then_asc("username");
/// assert_eq!(order.fields().len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderBy {
    pub(crate) fields: Vec<(String, Direction)>,
}

impl OrderBy {
    /// No sorting; rows keep their original order.
    pub fn none() -> Self {
        Self::default()
    }

    /// Creates an ascending order on a column.
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            fields: vec![(column.into(), Direction::Asc)],
        }
    }

    /// Creates a descending order on a column.
    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            fields: vec![(column.into(), Direction::Desc)],
        }
    }

    /// Adds a secondary ascending order on a column.
    pub fn then_asc(mut self, column: impl Into<String>) -> Self {
        self.fields.push((column.into(), Direction::Asc));
        self
    }

    /// Adds a secondary descending order on a column.
    pub fn then_desc(mut self, column: impl Into<String>) -> Self {
        self.fields.push((column.into(), Direction::Desc));
        self
    }

    /// Returns the ordered columns with their directions.
    pub fn fields(&self) -> &[(String, Direction)] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the position and direction of a column in this order.
    pub fn position(&self, column: &str) -> Option<(usize, Direction)> {
        self.fields
            .iter()
            .position(|(id, _)| id == column)
            .map(|idx| (idx, self.fields[idx].1))
    }

    /// Sets a column's direction, or removes it with `None`.
    ///
    /// With `multi`, other columns stay in place and a new column is appended
    /// as the least significant key. Without it, the column becomes the only
    /// key.
    pub(crate) fn set(&mut self, column: &str, direction: Option<Direction>, multi: bool) {
        if !multi {
            self.fields.clear();
            if let Some(direction) = direction {
                self.fields.push((column.to_string(), direction));
            }
            return;
        }

        match (self.fields.iter().position(|(id, _)| id == column), direction) {
            (Some(idx), Some(direction)) => self.fields[idx].1 = direction,
            (Some(idx), None) => {
                self.fields.remove(idx);
            }
            (None, Some(direction)) => self.fields.push((column.to_string(), direction)),
            (None, None) => {}
        }
    }
}

/// Compares two rows' sort keys.
///
/// `a` and `b` hold one value per sort column, in the same order as
/// `directions`. Nulls go last whatever the direction.
pub(crate) fn compare_keys(a: &[Value], b: &[Value], directions: &[Direction]) -> Ordering {
    for ((a, b), direction) in a.iter().zip(b).zip(directions) {
        let ordering = match (a.is_null(), b.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => return Ordering::Greater,
            (false, true) => return Ordering::Less,
            (false, false) => match direction {
                Direction::Asc => a.natural_cmp(b),
                Direction::Desc => a.natural_cmp(b).reverse(),
            },
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}
