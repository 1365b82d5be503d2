//! Chart selection from a result set's shape.
//!
//! Looks only at the first row to type the columns: the first string column
//! becomes the label axis, the first numeric column the value axis. Date-like
//! labels (`2023`, `2023-01`, `2023-01-15`) produce a line chart, anything
//! else a bar chart.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use tracing::debug;

/// One result row, keyed by column name.
pub type Row = serde_json::Map<String, Value>;

static TEMPORAL_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}(-\d{2}(-\d{2})?)?$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
}

/// What to draw and the data to draw it with.
#[derive(Debug, Clone, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub label_column: String,
    pub value_column: String,
    pub labels: Vec<String>,
    /// One per row. Values that are not numbers are `NaN` and serialize as `null`.
    #[serde(serialize_with = "serialize_gaps")]
    pub values: Vec<f64>,
}

fn serialize_gaps<S: Serializer>(values: &[f64], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(values.iter().map(|v| v.is_finite().then_some(*v)))
}

/// Whether a JSON value is a finite number.
pub fn is_numeric(value: &Value) -> bool {
    value.as_f64().is_some_and(f64::is_finite)
}

/// Whether a JSON value is a date-like string.
pub fn is_temporal(value: &Value) -> bool {
    value.as_str().is_some_and(|s| TEMPORAL_LABEL.is_match(s))
}

/// Pick a chart for a result set, or `None` when its shape does not support one.
pub fn classify(columns: &[String], rows: &[Row]) -> Option<ChartSpec> {
    if columns.len() < 2 {
        return None;
    }
    let first = rows.first()?;

    let label_column = columns
        .iter()
        .find(|c| first.get(c.as_str()).is_some_and(Value::is_string))?;
    let value_column = columns
        .iter()
        .find(|c| first.get(c.as_str()).is_some_and(is_numeric))?;

    let kind = if first.get(label_column.as_str()).is_some_and(is_temporal) {
        ChartKind::Line
    } else {
        ChartKind::Bar
    };

    let labels = rows
        .iter()
        .map(|row| label_text(row.get(label_column.as_str())))
        .collect();
    let values = rows
        .iter()
        .map(|row| coerce_number(row.get(value_column.as_str())))
        .collect();

    debug!(?kind, label = %label_column, value = %value_column, rows = rows.len(), "chart selected");

    Some(ChartSpec {
        kind,
        label_column: label_column.clone(),
        value_column: value_column.clone(),
        labels,
        values,
    })
}

fn label_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        None | Some(Value::Null) => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Numbers pass through, numeric strings are parsed, everything else is a gap.
fn coerce_number(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(f64::NAN),
        _ => f64::NAN,
    }
}
