//! Command-line arguments.

use std::path::PathBuf;
use std::str::FromStr;

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use datagrid_lib::ExportFormat;
use datagrid_lib::table::ColumnFilter;
use datagrid_lib::table::Direction;

#[derive(Debug, Parser)]
#[command(name = "datagrid")]
#[command(about = "Filter, sort, page and export JSON records", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print one page of the table
    Show {
        #[command(flatten)]
        view: ViewArgs,

        /// Page to show (1-based)
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Rows per page
        #[arg(long, default_value_t = 10)]
        page_size: usize,
    },

    /// Export every matching row
    Export {
        #[command(flatten)]
        view: ViewArgs,

        /// Output format: csv, json or excel
        #[arg(short, long, default_value = "csv")]
        format: ExportFormat,

        /// Output file (defaults to the export file name in the current directory)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Base name of the exported file
        #[arg(long, value_name = "NAME")]
        filename: Option<String>,

        /// Append today's date to the file name
        #[arg(long)]
        date_suffix: bool,
    },
}

/// Table state shared by every subcommand.
#[derive(Debug, Args)]
pub struct ViewArgs {
    /// JSON file holding an array of objects
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Sort key as `column:asc` or `column:desc` (repeatable, most significant first)
    #[arg(long = "sort", value_name = "COLUMN:DIR")]
    pub sort: Vec<SortArg>,

    /// Case-insensitive substring filter as `column=text` (repeatable)
    #[arg(long = "filter", value_name = "COLUMN=TEXT")]
    pub filter: Vec<FilterArg>,

    /// Inclusive range filter as `column=min..max`; either bound may be empty
    #[arg(long = "range", value_name = "COLUMN=MIN..MAX", value_parser = FilterArg::parse_range)]
    pub range: Vec<FilterArg>,

    /// Search across every column
    #[arg(short, long, value_name = "TEXT")]
    pub search: Option<String>,

    /// Hide a column (repeatable, remembered under the preference key)
    #[arg(long = "hide", value_name = "COLUMN")]
    pub hide: Vec<String>,

    /// Show every column again, forgetting hidden ones
    #[arg(long)]
    pub show_all: bool,

    /// Preference key for remembered column visibility
    #[arg(long, value_name = "KEY", default_value = "dataTablePrefs")]
    pub prefs_key: String,

    /// Do not read or write remembered preferences
    #[arg(long)]
    pub no_prefs: bool,
}

/// `column:asc` / `column:desc`.
#[derive(Debug, Clone, PartialEq)]
pub struct SortArg {
    pub column: String,
    pub direction: Direction,
}

impl FromStr for SortArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (column, direction) = match s.rsplit_once(':') {
            Some((column, dir)) => {
                let direction = match dir.to_ascii_lowercase().as_str() {
                    "asc" => Direction::Asc,
                    "desc" => Direction::Desc,
                    _ => return Err(format!("invalid sort direction '{}', expected asc or desc", dir)),
                };
                (column, direction)
            }
            None => (s, Direction::Asc),
        };
        if column.is_empty() {
            return Err(format!("missing column in sort '{}'", s));
        }
        Ok(Self {
            column: column.to_string(),
            direction,
        })
    }
}

/// A column id paired with a filter.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterArg {
    pub column: String,
    pub filter: ColumnFilter,
}

impl FilterArg {
    fn split(s: &str) -> Result<(&str, &str), String> {
        match s.split_once('=') {
            Some((column, rest)) if !column.is_empty() => Ok((column, rest)),
            _ => Err(format!("expected COLUMN=VALUE, got '{}'", s)),
        }
    }

    /// Parses `column=min..max`. Bounds are numbers or dates; a date-only
    /// upper bound covers that whole day.
    pub fn parse_range(s: &str) -> Result<Self, String> {
        let (column, range) = Self::split(s)?;
        let Some((min, max)) = range.split_once("..") else {
            return Err(format!("expected MIN..MAX, got '{}'", range));
        };
        let (min, max) = (min.trim(), max.trim());

        let numbers = (parse_opt::<f64>(min), parse_opt::<f64>(max));
        let filter = if let (Ok(min), Ok(max)) = numbers {
            ColumnFilter::range(min, max)
        } else {
            let from = parse_date_bound(min, false)?;
            let to = parse_date_bound(max, true)?;
            ColumnFilter::date_range(from, to)
        };

        if filter.is_empty() {
            return Err(format!("range '{}' has no bounds", s));
        }
        Ok(Self {
            column: column.to_string(),
            filter,
        })
    }
}

impl FromStr for FilterArg {
    type Err = String;

    /// Parses `column=text` as a substring filter.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (column, value) = Self::split(s)?;
        Ok(Self {
            column: column.to_string(),
            filter: ColumnFilter::contains(value),
        })
    }
}

fn parse_opt<T: FromStr>(s: &str) -> Result<Option<T>, T::Err> {
    if s.is_empty() { Ok(None) } else { s.parse().map(Some) }
}

fn parse_date_bound(s: &str, end_of_day: bool) -> Result<Option<DateTime<Utc>>, String> {
    if s.is_empty() {
        return Ok(None);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("invalid range bound '{}', expected a number or date", s))?;
    let time = if end_of_day {
        date.and_hms_milli_opt(23, 59, 59, 999)
    } else {
        date.and_hms_opt(0, 0, 0)
    };
    Ok(time.map(|t| t.and_utc()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_arg() {
        let arg: SortArg = "bits_earned:desc".parse().unwrap();
        assert_eq!(arg.column, "bits_earned");
        assert_eq!(arg.direction, Direction::Desc);
        assert_eq!("level".parse::<SortArg>().unwrap().direction, Direction::Asc);
        assert!("level:up".parse::<SortArg>().is_err());
        assert!(":asc".parse::<SortArg>().is_err());
    }

    #[test]
    fn test_numeric_range() {
        let arg = FilterArg::parse_range("bits=5..").unwrap();
        assert_eq!(arg.filter, ColumnFilter::range(Some(5.0), None));
        assert!(FilterArg::parse_range("bits=..").is_err());
        assert!(FilterArg::parse_range("bits=5").is_err());
    }

    #[test]
    fn test_date_range_covers_whole_end_day() {
        let arg = FilterArg::parse_range("created_at=2024-01-01..2024-01-31").unwrap();
        let ColumnFilter::DateRange { from, to } = arg.filter else {
            panic!("expected date range");
        };
        assert_eq!(from.unwrap().to_rfc3339(), "2024-01-01T00:00:00+00:00");
        assert_eq!(to.unwrap().format("%H:%M:%S").to_string(), "23:59:59");
    }

    #[test]
    fn test_text_filter() {
        let arg: FilterArg = "username=bro".parse().unwrap();
        assert_eq!(arg.filter, ColumnFilter::contains("bro"));
        assert!("=bro".parse::<FilterArg>().is_err());
    }
}
