//! Intent extraction: English text → [`IntentRecord`].
//!
//! ```text
//! text → normalize → tokenize → cue dispatcher → IntentRecord
//! ```
//!
//! Extraction is total. Words the rules cannot place are dropped and, unless
//! they are filler words, reported as [`Ambiguity::UnrecognizedToken`].

mod cues;
mod extract;
mod inflection;
mod normalize;

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use crate::catalog::{Aggregate, ColumnRef};
pub use crate::sql::{SortDir, TimeGrain};
pub use extract::{extract_intent, extract_intent_with, ExtractOptions};
pub use inflection::singularize;
pub use normalize::{normalize, tokenize, DateSpan, Tok, TokKind};

/// What the metric aggregates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Measure {
    /// A catalog measure (`sales`, `quantity`, `price`).
    Named { name: String },
    /// Rows of an entity table; `None` counts the catalog's default table.
    Rows { table: Option<String> },
}

/// The single aggregate a query computes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metric {
    pub aggregate: Aggregate,
    pub measure: Measure,
}

impl Metric {
    /// `COUNT(*)` over the default table.
    pub fn row_count() -> Self {
        Self {
            aggregate: Aggregate::Count,
            measure: Measure::Rows { table: None },
        }
    }
}

/// A grouping key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Dimension {
    Column { column: ColumnRef },
    TimeBucket { column: ColumnRef, grain: TimeGrain },
}

impl Dimension {
    pub fn column(&self) -> &ColumnRef {
        match self {
            Dimension::Column { column } | Dimension::TimeBucket { column, .. } => column,
        }
    }

    /// Result column name: the column name, or the grain for time buckets.
    pub fn output_name(&self) -> &str {
        match self {
            Dimension::Column { column } => &column.column,
            Dimension::TimeBucket { grain, .. } => grain.as_str(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOp {
    Eq,
    In,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl FilterOp {
    pub fn describe(&self) -> &'static str {
        match self {
            FilterOp::Eq => "is",
            FilterOp::In => "is one of",
            FilterOp::Gt => "is greater than",
            FilterOp::Gte => "is at least",
            FilterOp::Lt => "is less than",
            FilterOp::Lte => "is at most",
        }
    }
}

/// A filter operand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FilterValue {
    /// A catalog known value, in canonical casing.
    Known(String),
    /// Free text, lowercase; compared case-insensitively.
    Text(String),
    Number(f64),
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Known(v) => write!(f, "{}", v),
            FilterValue::Text(v) => write!(f, "\"{}\"", v),
            FilterValue::Number(n) => write!(f, "{}", n),
        }
    }
}

/// `column op values`. `Eq` and comparisons carry one value, `In` one or more.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub column: ColumnRef,
    pub op: FilterOp,
    pub values: Vec<FilterValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OrderTarget {
    Metric,
    Dimension { dimension: Dimension },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ordering {
    pub target: OrderTarget,
    pub direction: SortDir,
}

/// A date range on the catalog's date column. Ranges are half-open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimeWindow {
    Year { year: i32 },
    Month { year: i32, month: u32 },
    Day { date: NaiveDate },
    Since { start: NaiveDate },
    Before { end: NaiveDate },
    Between { start: NaiveDate, end: NaiveDate },
}

impl TimeWindow {
    /// `(inclusive start, exclusive end)`.
    pub fn bounds(&self) -> (Option<NaiveDate>, Option<NaiveDate>) {
        match *self {
            TimeWindow::Year { year } => {
                let span = DateSpan::Year(year);
                (span.start(), span.end())
            }
            TimeWindow::Month { year, month } => {
                let span = DateSpan::Month(year, month);
                (span.start(), span.end())
            }
            TimeWindow::Day { date } => (Some(date), date.succ_opt()),
            TimeWindow::Since { start } => (Some(start), None),
            TimeWindow::Before { end } => (None, Some(end)),
            TimeWindow::Between { start, end } => (Some(start), Some(end)),
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeWindow::Year { year } => write!(f, "year {}", year),
            TimeWindow::Month { year, month } => write!(f, "month {}-{:02}", year, month),
            TimeWindow::Day { date } => write!(f, "day {}", date),
            TimeWindow::Since { start } => write!(f, "dates from {} onwards", start),
            TimeWindow::Before { end } => write!(f, "dates before {}", end),
            TimeWindow::Between { start, end } => match end.pred_opt() {
                Some(last) if last >= *start => write!(f, "dates from {} to {}", start, last),
                _ => write!(f, "dates from {} before {}", start, end),
            },
        }
    }
}

/// Non-fatal findings made while reading the text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Ambiguity {
    UnrecognizedToken { token: String },
    IgnoredMetricCue { cue: String },
    OverwrittenFilter { column: ColumnRef },
    OverwrittenTimeWindow { previous: TimeWindow },
    InvalidLimit { value: String },
    YearOutOfRange { year: i32 },
}

impl fmt::Display for Ambiguity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ambiguity::UnrecognizedToken { token } => {
                write!(f, "ignored unrecognized word \"{}\"", token)
            }
            Ambiguity::IgnoredMetricCue { cue } => {
                write!(f, "ignored second aggregate \"{}\"", cue)
            }
            Ambiguity::OverwrittenFilter { column } => {
                write!(f, "a later filter on {} replaced an earlier one", column.column)
            }
            Ambiguity::OverwrittenTimeWindow { previous } => {
                write!(f, "a later date range replaced {}", previous)
            }
            Ambiguity::InvalidLimit { value } => {
                write!(f, "ignored row limit {} (must be positive)", value)
            }
            Ambiguity::YearOutOfRange { year } => {
                write!(f, "ignored year {} (out of range)", year)
            }
        }
    }
}

/// Structured reading of one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentRecord {
    pub metric: Metric,
    pub dimensions: Vec<Dimension>,
    pub filters: Vec<Filter>,
    pub ordering: Option<Ordering>,
    pub limit: Option<u64>,
    pub time_window: Option<TimeWindow>,
    pub warnings: Vec<Ambiguity>,
}

impl Default for IntentRecord {
    fn default() -> Self {
        Self {
            metric: Metric::row_count(),
            dimensions: vec![],
            filters: vec![],
            ordering: None,
            limit: None,
            time_window: None,
            warnings: vec![],
        }
    }
}

impl IntentRecord {
    pub fn filter_on(&self, column: &ColumnRef) -> Option<&Filter> {
        self.filters.iter().find(|f| &f.column == column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_year_bounds_are_half_open() {
        let window = TimeWindow::Year { year: 2023 };
        assert_eq!(window.bounds(), (Some(date(2023, 1, 1)), Some(date(2024, 1, 1))));
    }

    #[test]
    fn test_december_rolls_into_next_year() {
        let window = TimeWindow::Month { year: 2023, month: 12 };
        assert_eq!(window.bounds(), (Some(date(2023, 12, 1)), Some(date(2024, 1, 1))));
    }

    #[test]
    fn test_day_bounds() {
        let window = TimeWindow::Day { date: date(2024, 2, 29) };
        assert_eq!(window.bounds(), (Some(date(2024, 2, 29)), Some(date(2024, 3, 1))));
    }

    #[test]
    fn test_window_display() {
        assert_eq!(TimeWindow::Year { year: 2023 }.to_string(), "year 2023");
        assert_eq!(
            TimeWindow::Month { year: 2023, month: 3 }.to_string(),
            "month 2023-03"
        );
        let between = TimeWindow::Between {
            start: date(2023, 1, 1),
            end: date(2023, 4, 1),
        };
        assert_eq!(between.to_string(), "dates from 2023-01-01 to 2023-03-31");
    }

    #[test]
    fn test_default_record_counts_rows() {
        let record = IntentRecord::default();
        assert_eq!(record.metric, Metric::row_count());
        assert!(record.dimensions.is_empty());
        assert!(record.limit.is_none());
    }

    #[test]
    fn test_record_serializes_with_tags() {
        let record = IntentRecord {
            metric: Metric {
                aggregate: Aggregate::Sum,
                measure: Measure::Named { name: "sales".into() },
            },
            ..IntentRecord::default()
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["metric"]["aggregate"], "sum");
        assert_eq!(json["metric"]["measure"]["kind"], "named");
        assert_eq!(json["metric"]["measure"]["name"], "sales");
    }
}
