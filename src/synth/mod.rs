//! Query synthesis: [`IntentRecord`] → SQL text + description.
//!
//! ```text
//! IntentRecord → resolve against Catalog → plan joins → Query AST → SQL
//!                                                    ↘ description
//! ```
//!
//! Every identifier in the output comes from the catalog and every value is a
//! typed literal, so nothing from the user's text reaches the SQL unquoted.

mod describe;
mod joins;

use serde::Serialize;
use tracing::debug;

use crate::catalog::{Aggregate, Catalog, Column, ColumnRef, MeasureExpr};
use crate::intent::{
    singularize, Ambiguity, Dimension, Filter, FilterOp, FilterValue, IntentRecord, Measure,
    OrderTarget, SortDir,
};
use crate::sql::{
    avg, col, count, count_distinct, count_star, date_bucket, func, lit_date, lit_float, lit_int,
    lit_str, max, min, sum, table_col, Dialect, Expr, ExprExt, OrderByExpr, Query, SelectExpr,
    TableRef,
};

pub use describe::describe;
pub use joins::{plan_joins, JoinPlan, PlannedJoin};

// ============================================================================
// Error Types
// ============================================================================

/// The intent refers to something the catalog cannot provide.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaResolutionError {
    #[error("Unknown table: {0}")]
    UnknownTable(String),

    #[error("Unknown column: {0}")]
    UnknownColumn(ColumnRef),

    #[error("Unknown measure: {0}")]
    UnknownMeasure(String),

    #[error("No join path connects tables: {}", .tables.join(", "))]
    NoJoinPath { tables: Vec<String> },
}

pub type SynthResult<T> = Result<T, SchemaResolutionError>;

// ============================================================================
// Output
// ============================================================================

/// A rendered query and its plain-English restatement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Translation {
    /// The SELECT statement.
    pub query: String,
    /// What the query computes, in one sentence.
    pub description: String,
    pub dialect: Dialect,
    pub intent: IntentRecord,
    pub warnings: Vec<Ambiguity>,
}

// ============================================================================
// Synthesis
// ============================================================================

/// Render an intent as SQL for `dialect`.
///
/// Deterministic: equal inputs produce byte-identical output.
pub fn synthesize(
    intent: &IntentRecord,
    catalog: &Catalog,
    dialect: Dialect,
) -> SynthResult<Translation> {
    let query = build_query(intent, catalog)?;
    let sql = query.to_sql(dialect);

    Ok(Translation {
        query: sql,
        description: describe(intent, catalog),
        dialect,
        intent: intent.clone(),
        warnings: intent.warnings.clone(),
    })
}

/// Build the query AST for an intent.
pub fn build_query(intent: &IntentRecord, catalog: &Catalog) -> SynthResult<Query> {
    let metric = resolve_metric(intent, catalog)?;

    let mut dimensions: Vec<&Dimension> = intent.dimensions.iter().collect();
    if let Some(OrderTarget::Dimension { dimension }) = intent.ordering.as_ref().map(|o| &o.target)
    {
        if !dimensions.contains(&dimension) {
            dimensions.push(dimension);
        }
    }

    let mut tables: Vec<&str> = vec![metric.table.as_str()];
    for dimension in &dimensions {
        resolve_column(catalog, dimension.column())?;
        tables.push(&dimension.column().table);
    }
    for filter in &intent.filters {
        resolve_column(catalog, &filter.column)?;
        tables.push(&filter.column.table);
    }
    if intent.time_window.is_some() {
        resolve_column(catalog, &catalog.date_column)?;
        tables.push(&catalog.date_column.table);
    }
    let required = required_tables(catalog, &tables);
    let plan = plan_joins(catalog, &required)?;

    // Select list: dimensions, then the metric.
    let mut select: Vec<SelectExpr> = vec![];
    let mut group_by: Vec<Expr> = vec![];
    let mut aliases: Vec<String> = vec![];
    for dimension in &dimensions {
        let expr = dimension_expr(dimension);
        let alias = unique_alias(&mut aliases, dimension);
        select.push(expr.clone().alias(&alias));
        group_by.push(expr);
    }

    let aggregate = match &metric.counted {
        Some((table, pk)) if plan.fans_out(catalog, table) => count_distinct(table_col(table, pk)),
        Some(_) => count_star(),
        None => aggregate_expr(metric.aggregate, metric.expr.clone()),
    };
    select.push(aggregate.alias(&metric.alias));

    let mut query = Query::new()
        .select(select)
        .from(TableRef::new(&plan.base));
    for join in &plan.joins {
        let key = join.key;
        query = query.inner_join(
            TableRef::new(&join.table),
            table_col(&key.left.table, &key.left.column)
                .eq(table_col(&key.right.table, &key.right.column)),
        );
    }

    for filter in &intent.filters {
        query = query.filter(filter_expr(filter));
    }
    if let Some(window) = &intent.time_window {
        let date = &catalog.date_column;
        let (start, end) = window.bounds();
        if let Some(start) = start {
            query = query.filter(table_col(&date.table, &date.column).gte(lit_date(start)));
        }
        if let Some(end) = end {
            query = query.filter(table_col(&date.table, &date.column).lt(lit_date(end)));
        }
    }

    let dimension_alias = |target: &Dimension| {
        dimensions
            .iter()
            .position(|d| *d == target)
            .map(|i| aliases[i].clone())
            .unwrap_or_else(|| target.output_name().to_string())
    };
    let order_by = match &intent.ordering {
        Some(ordering) => {
            let alias = match &ordering.target {
                OrderTarget::Metric => metric.alias.clone(),
                OrderTarget::Dimension { dimension } => dimension_alias(dimension),
            };
            vec![OrderByExpr::new(col(&alias), ordering.direction)]
        }
        None if dimensions.is_empty() => vec![],
        None => {
            let buckets: Vec<OrderByExpr> = dimensions
                .iter()
                .filter(|d| matches!(d, Dimension::TimeBucket { .. }))
                .map(|d| OrderByExpr::asc(col(&dimension_alias(*d))))
                .collect();
            if buckets.is_empty() {
                vec![OrderByExpr::new(
                    col(&metric.alias),
                    SortDir::Desc,
                )]
            } else {
                buckets
            }
        }
    };

    query = query.group_by(group_by).order_by(order_by);
    if let Some(limit) = intent.limit {
        query = query.limit(limit);
    }

    debug!(base = %plan.base, joins = plan.joins.len(), alias = %metric.alias, "synthesized query");
    Ok(query)
}

/// The metric after catalog resolution.
struct ResolvedMetric {
    aggregate: Aggregate,
    /// Measure expression; unused for row counts.
    expr: Expr,
    alias: String,
    /// Table the metric reads from.
    table: String,
    /// `(table, primary key)` when counting entity rows.
    counted: Option<(String, String)>,
}

fn resolve_metric(intent: &IntentRecord, catalog: &Catalog) -> SynthResult<ResolvedMetric> {
    let aggregate = intent.metric.aggregate;
    match &intent.metric.measure {
        Measure::Named { name } => {
            let measure = catalog
                .measure(name)
                .ok_or_else(|| SchemaResolutionError::UnknownMeasure(name.clone()))?;
            let table = measure.table.as_str();
            for column in measure.expr.columns() {
                resolve_column(catalog, &ColumnRef::new(table, column))?;
            }
            let expr = match &measure.expr {
                MeasureExpr::Column(c) => table_col(table, c),
                MeasureExpr::Product(a, b) => table_col(table, a).mul(table_col(table, b)),
            };
            Ok(ResolvedMetric {
                aggregate,
                expr,
                alias: format!("{}_{}", aggregate.alias_prefix(), measure.name),
                table: table.to_string(),
                counted: None,
            })
        }
        Measure::Rows { table } => {
            let name = table.as_deref().unwrap_or(&catalog.default_table);
            let table = catalog
                .table(name)
                .ok_or_else(|| SchemaResolutionError::UnknownTable(name.to_string()))?;
            Ok(ResolvedMetric {
                aggregate: Aggregate::Count,
                expr: count_star(),
                alias: format!("{}_count", singularize(&table.name)),
                table: table.name.clone(),
                counted: Some((table.name.clone(), table.primary_key.clone())),
            })
        }
    }
}

fn resolve_column<'c>(catalog: &'c Catalog, column: &ColumnRef) -> SynthResult<&'c Column> {
    let table = catalog
        .table(&column.table)
        .ok_or_else(|| SchemaResolutionError::UnknownTable(column.table.clone()))?;
    table
        .column(&column.column)
        .ok_or_else(|| SchemaResolutionError::UnknownColumn(column.clone()))
}

/// Deduplicate and put tables in catalog order.
fn required_tables(catalog: &Catalog, tables: &[&str]) -> Vec<String> {
    let mut required: Vec<String> = vec![];
    for table in tables {
        if !required.iter().any(|t| t == table) {
            required.push(table.to_string());
        }
    }
    required.sort_by_key(|t| catalog.table_position(t).unwrap_or(usize::MAX));
    required
}

fn aggregate_expr(aggregate: Aggregate, expr: Expr) -> Expr {
    match aggregate {
        Aggregate::Count => count(expr),
        Aggregate::Sum => sum(expr),
        Aggregate::Avg => avg(expr),
        Aggregate::Min => min(expr),
        Aggregate::Max => max(expr),
    }
}

fn dimension_expr(dimension: &Dimension) -> Expr {
    match dimension {
        Dimension::Column { column } => table_col(&column.table, &column.column),
        Dimension::TimeBucket { column, grain } => {
            date_bucket(table_col(&column.table, &column.column), *grain)
        }
    }
}

/// Output name for a dimension, qualified by table when the plain name is taken.
fn unique_alias(taken: &mut Vec<String>, dimension: &Dimension) -> String {
    let plain = dimension.output_name().to_string();
    let alias = if taken.contains(&plain) {
        format!("{}_{}", dimension.column().table, plain)
    } else {
        plain
    };
    taken.push(alias.clone());
    alias
}

fn number_literal(n: f64) -> Expr {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        lit_int(n as i64)
    } else {
        lit_float(n)
    }
}

fn filter_expr(filter: &Filter) -> Expr {
    let column = table_col(&filter.column.table, &filter.column.column);
    let free_text = filter
        .values
        .iter()
        .any(|v| matches!(v, FilterValue::Text(_)));

    // Free text compares case-insensitively; known values keep their catalog casing.
    let (lhs, literals): (Expr, Vec<Expr>) = if free_text {
        let literals = filter
            .values
            .iter()
            .map(|v| match v {
                FilterValue::Known(s) | FilterValue::Text(s) => lit_str(&s.to_lowercase()),
                FilterValue::Number(n) => number_literal(*n),
            })
            .collect();
        (func("LOWER", vec![column]), literals)
    } else {
        let literals = filter
            .values
            .iter()
            .map(|v| match v {
                FilterValue::Known(s) | FilterValue::Text(s) => lit_str(s),
                FilterValue::Number(n) => number_literal(*n),
            })
            .collect();
        (column, literals)
    };

    let single = match literals.as_slice() {
        [only] => Some(only.clone()),
        _ => None,
    };
    match (filter.op, single) {
        (FilterOp::Eq, Some(value)) => lhs.eq(value),
        (FilterOp::Gt, Some(value)) => lhs.gt(value),
        (FilterOp::Gte, Some(value)) => lhs.gte(value),
        (FilterOp::Lt, Some(value)) => lhs.lt(value),
        (FilterOp::Lte, Some(value)) => lhs.lte(value),
        _ => lhs.in_list(literals),
    }
}
