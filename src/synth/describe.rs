//! Plain-English restatement of an intent.

use crate::catalog::{Aggregate, Catalog, ColumnRef};
use crate::intent::{Dimension, Filter, FilterOp, IntentRecord, Measure, OrderTarget};

/// Describe what a query for `intent` computes.
///
/// `Total sales grouped by category, filtered to year 2023, limited to 5 rows`.
/// Warnings are appended as a trailing `Note:` sentence.
pub fn describe(intent: &IntentRecord, catalog: &Catalog) -> String {
    let metric = metric_label(intent, catalog);
    let mut text = metric.clone();

    if !intent.dimensions.is_empty() {
        let names: Vec<String> = intent
            .dimensions
            .iter()
            .map(|d| dimension_label(d, catalog))
            .collect();
        text.push_str(" grouped by ");
        text.push_str(&join_words(&names));
    }

    if !intent.filters.is_empty() {
        let filters: Vec<String> = intent
            .filters
            .iter()
            .map(|f| filter_label(f, catalog))
            .collect();
        text.push_str(", where ");
        text.push_str(&filters.join(" and "));
    }

    if let Some(window) = &intent.time_window {
        text.push_str(&format!(", filtered to {}", window));
    }

    if let Some(ordering) = &intent.ordering {
        let target = match &ordering.target {
            OrderTarget::Metric => metric.to_lowercase(),
            OrderTarget::Dimension { dimension } => dimension_label(dimension, catalog),
        };
        text.push_str(&format!(
            ", sorted by {} {}",
            target,
            ordering.direction.as_str()
        ));
    }

    if let Some(limit) = intent.limit {
        let unit = if limit == 1 { "row" } else { "rows" };
        text.push_str(&format!(", limited to {} {}", limit, unit));
    }

    if !intent.warnings.is_empty() {
        let notes: Vec<String> = intent.warnings.iter().map(|w| w.to_string()).collect();
        text.push_str(&format!(". Note: {}.", notes.join("; ")));
    }

    text
}

fn metric_label(intent: &IntentRecord, catalog: &Catalog) -> String {
    match (&intent.metric.aggregate, &intent.metric.measure) {
        (_, Measure::Rows { table }) => {
            let table = table.as_deref().unwrap_or(&catalog.default_table);
            format!("Number of {}", table)
        }
        (Aggregate::Count, Measure::Named { name }) => format!("Count of {}", name),
        (aggregate, Measure::Named { name }) => format!("{} {}", aggregate.label(), name),
    }
}

fn column_label(column: &ColumnRef, catalog: &Catalog) -> String {
    catalog
        .column(column)
        .and_then(|c| c.synonyms.first().cloned())
        .unwrap_or_else(|| column.column.replace('_', " "))
}

fn dimension_label(dimension: &Dimension, catalog: &Catalog) -> String {
    match dimension {
        Dimension::Column { column } => column_label(column, catalog),
        Dimension::TimeBucket { column, grain } if *column == catalog.date_column => {
            grain.as_str().to_string()
        }
        Dimension::TimeBucket { column, grain } => {
            format!("{} ({})", column_label(column, catalog), grain.as_str())
        }
    }
}

fn filter_label(filter: &Filter, catalog: &Catalog) -> String {
    let values: Vec<String> = filter.values.iter().map(|v| v.to_string()).collect();
    let values = match filter.op {
        FilterOp::In => values.join(", "),
        _ => values.join(" "),
    };
    format!(
        "{} {} {}",
        column_label(&filter.column, catalog),
        filter.op.describe(),
        values
    )
}

/// `a`, `a and b`, `a, b and c`.
fn join_words(words: &[String]) -> String {
    match words {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::extract_intent;

    fn describe_text(text: &str) -> String {
        let catalog = Catalog::demo();
        describe(&extract_intent(text, &catalog), &catalog)
    }

    #[test]
    fn test_grouped_and_filtered() {
        assert_eq!(
            describe_text("total sales by category in 2023"),
            "Total sales grouped by category, filtered to year 2023"
        );
    }

    #[test]
    fn test_top_n_description() {
        assert_eq!(
            describe_text("top 5 customers by total sales in 2023"),
            "Total sales grouped by customer, filtered to year 2023, \
             sorted by total sales descending, limited to 5 rows"
        );
    }

    #[test]
    fn test_empty_description() {
        assert_eq!(describe_text(""), "Number of orders");
    }

    #[test]
    fn test_filter_description() {
        assert_eq!(
            describe_text("average price for north or south by category"),
            "Average price grouped by category, where region is one of North, South"
        );
    }

    #[test]
    fn test_warning_note() {
        assert_eq!(
            describe_text("sales by wibble"),
            "Total sales. Note: ignored unrecognized word \"wibble\"."
        );
    }

    #[test]
    fn test_join_words() {
        let words = |ws: &[&str]| ws.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert_eq!(join_words(&words(&["a"])), "a");
        assert_eq!(join_words(&words(&["a", "b"])), "a and b");
        assert_eq!(join_words(&words(&["a", "b", "c"])), "a, b and c");
    }
}
