//! The cue rule table.
//!
//! Each rule looks at the tokens from the scanner's current position and
//! either claims a run of them (returning how many) or returns 0. The
//! dispatcher tries [`RULES`] in order at every position, so an earlier rule
//! wins any overlap with a later one.

use super::extract::{OrderHint, Scanner};
use super::normalize::{DateSpan, Tok, TokKind};
use super::{
    Aggregate, Dimension, Filter, FilterOp, FilterValue, Measure, SortDir, TimeGrain, TimeWindow,
};
use crate::catalog::{Catalog, Column, ColumnRef, ColumnType};

pub(super) type RuleFn = fn(&mut Scanner<'_>) -> usize;

/// Rules in priority order.
pub(super) const RULES: &[(&str, RuleFn)] = &[
    ("time", time_cue),
    ("limit", limit_cue),
    ("filter", filter_cue),
    ("metric", metric_cue),
    ("ordering", ordering_cue),
    ("dimension", dimension_cue),
    ("known_value", known_value_cue),
    ("noun", noun_cue),
];

// ============================================================================
// Vocabulary
// ============================================================================

/// Filler words that are dropped without a warning.
static STOPWORDS: &[&str] = &[
    "a", "about", "across", "all", "also", "am", "an", "and", "any", "are", "as", "at", "be",
    "been", "bought", "breakdown", "broken", "but", "buy", "by", "can", "could", "data", "did",
    "display", "do", "does", "down", "each", "every", "find", "for", "from", "get", "give", "go",
    "group", "grouped", "had", "has", "have", "i", "in", "into", "is", "it", "its", "just", "let",
    "list", "made", "make", "me", "much", "my", "of", "on", "or", "our", "over", "per", "place",
    "placed", "please", "report", "see", "show", "sold", "split", "than", "that", "the", "their",
    "them", "there", "these", "this", "those", "to", "us", "value", "values", "want", "was", "we",
    "were", "what", "whats", "when", "where", "which", "who", "whose", "with", "would", "you",
    "your",
];

pub(super) fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(&word)
}

static METRIC_CUES: &[(&[&str], Aggregate)] = &[
    (&["sum", "of"], Aggregate::Sum),
    (&["number", "of"], Aggregate::Count),
    (&["count", "of"], Aggregate::Count),
    (&["how", "many"], Aggregate::Count),
    (&["total"], Aggregate::Sum),
    (&["sum"], Aggregate::Sum),
    (&["average"], Aggregate::Avg),
    (&["avg"], Aggregate::Avg),
    (&["mean"], Aggregate::Avg),
    (&["count"], Aggregate::Count),
    (&["max"], Aggregate::Max),
    (&["maximum"], Aggregate::Max),
    (&["highest"], Aggregate::Max),
    (&["largest"], Aggregate::Max),
    (&["biggest"], Aggregate::Max),
    (&["min"], Aggregate::Min),
    (&["minimum"], Aggregate::Min),
    (&["lowest"], Aggregate::Min),
    (&["smallest"], Aggregate::Min),
];

/// Words allowed between an aggregate cue and its measure ("sum of all revenue").
static MEASURE_FILLERS: &[&str] = &["of", "the", "all", "our"];

static DIRECTIONS: &[(&[&str], SortDir, Option<OrderHint>)] = &[
    (&["most", "recent", "first"], SortDir::Desc, Some(OrderHint::Chronological)),
    (&["newest", "first"], SortDir::Desc, Some(OrderHint::Chronological)),
    (&["latest", "first"], SortDir::Desc, Some(OrderHint::Chronological)),
    (&["oldest", "first"], SortDir::Asc, Some(OrderHint::Chronological)),
    (&["earliest", "first"], SortDir::Asc, Some(OrderHint::Chronological)),
    (&["alphabetically"], SortDir::Asc, Some(OrderHint::Alphabetical)),
    (&["alphabetical"], SortDir::Asc, Some(OrderHint::Alphabetical)),
    (&["ascending"], SortDir::Asc, None),
    (&["asc"], SortDir::Asc, None),
    (&["increasing"], SortDir::Asc, None),
    (&["descending"], SortDir::Desc, None),
    (&["desc"], SortDir::Desc, None),
    (&["decreasing"], SortDir::Desc, None),
];

static SORT_LEADS: &[&str] = &["sorted", "sort", "ordered", "order", "ranked", "rank"];

static TIME_BUCKETS: &[(&str, TimeGrain)] = &[
    ("month", TimeGrain::Month),
    ("months", TimeGrain::Month),
    ("monthly", TimeGrain::Month),
    ("year", TimeGrain::Year),
    ("years", TimeGrain::Year),
    ("yearly", TimeGrain::Year),
    ("annual", TimeGrain::Year),
    ("annually", TimeGrain::Year),
    ("day", TimeGrain::Day),
    ("days", TimeGrain::Day),
    ("daily", TimeGrain::Day),
];

static MONTHS: &[(&str, u32)] = &[
    ("january", 1),
    ("jan", 1),
    ("february", 2),
    ("feb", 2),
    ("march", 3),
    ("mar", 3),
    ("april", 4),
    ("apr", 4),
    ("may", 5),
    ("june", 6),
    ("jun", 6),
    ("july", 7),
    ("jul", 7),
    ("august", 8),
    ("aug", 8),
    ("september", 9),
    ("sep", 9),
    ("sept", 9),
    ("october", 10),
    ("oct", 10),
    ("november", 11),
    ("nov", 11),
    ("december", 12),
    ("dec", 12),
];

static FILTER_LEADS: &[&str] = &["where", "with", "for", "whose", "having"];

static COPULAS: &[&str] = &["is", "are", "was", "were", "equals", "equal", "to", "named", "called"];

static BARE_COPULAS: &[&str] = &["is", "are", "equals"];

static CONNECTORS: &[&str] = &["and", "or"];

static COMPARATORS: &[(&[&str], FilterOp)] = &[
    (&["greater", "than", "or", "equal", "to"], FilterOp::Gte),
    (&["more", "than", "or", "equal", "to"], FilterOp::Gte),
    (&["less", "than", "or", "equal", "to"], FilterOp::Lte),
    (&["greater", "than"], FilterOp::Gt),
    (&["more", "than"], FilterOp::Gt),
    (&["higher", "than"], FilterOp::Gt),
    (&["larger", "than"], FilterOp::Gt),
    (&["bigger", "than"], FilterOp::Gt),
    (&["less", "than"], FilterOp::Lt),
    (&["fewer", "than"], FilterOp::Lt),
    (&["lower", "than"], FilterOp::Lt),
    (&["smaller", "than"], FilterOp::Lt),
    (&["at", "least"], FilterOp::Gte),
    (&["at", "most"], FilterOp::Lte),
    (&["equal", "to"], FilterOp::Eq),
    (&["over"], FilterOp::Gt),
    (&["above"], FilterOp::Gt),
    (&["exceeding"], FilterOp::Gt),
    (&["below"], FilterOp::Lt),
    (&["under"], FilterOp::Lt),
    (&["equals"], FilterOp::Eq),
];

/// Cue words that never belong to a free-text filter value.
fn is_cue_word(word: &str) -> bool {
    METRIC_CUES.iter().any(|(p, _)| p[0] == word)
        || DIRECTIONS.iter().any(|(p, _, _)| p[0] == word)
        || SORT_LEADS.contains(&word)
        || TIME_BUCKETS.iter().any(|(w, _)| *w == word)
        || MONTHS.iter().any(|(w, _)| *w == word)
        || COMPARATORS.iter().any(|(p, _)| p[0] == word)
        || matches!(
            word,
            "top" | "bottom" | "limit" | "first" | "since" | "after" | "before" | "until"
                | "till" | "between" | "during" | "sorted"
        )
}

fn month_number(word: &str) -> Option<u32> {
    MONTHS.iter().find(|(w, _)| *w == word).map(|(_, m)| *m)
}

// ============================================================================
// Rule 1: time windows
// ============================================================================

/// A date span at `offset`: `march 2024`, `2024-03`, `2024-03-15` or `2024`.
fn span_at(s: &Scanner<'_>, offset: usize) -> Option<(DateSpan, usize)> {
    if let Some(month) = s.word(offset).and_then(month_number) {
        if let Some(year) = s.tok(offset + 1).and_then(Tok::year) {
            return Some((DateSpan::Month(year, month), 2));
        }
    }
    s.tok(offset)
        .and_then(Tok::date_span)
        .map(|span| (span, 1))
}

/// The window covering exactly one span.
fn exact(span: DateSpan) -> TimeWindow {
    match span {
        DateSpan::Year(year) => TimeWindow::Year { year },
        DateSpan::Month(year, month) => TimeWindow::Month { year, month },
        DateSpan::Day(date) => TimeWindow::Day { date },
    }
}

/// Warn about the first span whose year is out of range. Returns whether all are in range.
fn years_in_range(s: &mut Scanner<'_>, spans: &[DateSpan]) -> bool {
    match spans
        .iter()
        .find(|span| !s.options.year_in_range(span.year()))
    {
        Some(span) => {
            let year = span.year();
            s.draft
                .warnings
                .push(super::Ambiguity::YearOutOfRange { year });
            false
        }
        None => true,
    }
}

fn time_cue(s: &mut Scanner<'_>) -> usize {
    let Some(first) = s.tok(0) else {
        return 0;
    };

    let lead = s.word(0).unwrap_or_default();
    match lead {
        "between" | "from" => {
            let Some((a, a_len)) = span_at(s, 1) else {
                return 0;
            };
            let connectors: &[&str] = if lead == "between" {
                &["and", "to"]
            } else {
                &["to", "until", "till", "through", "and"]
            };
            let connected = s
                .word(1 + a_len)
                .is_some_and(|w| connectors.contains(&w));
            if connected {
                if let Some((b, b_len)) = span_at(s, 2 + a_len) {
                    let consumed = 2 + a_len + b_len;
                    if !years_in_range(s, &[a, b]) {
                        return consumed;
                    }
                    let (Some(a_start), Some(a_end), Some(b_start), Some(b_end)) =
                        (a.start(), a.end(), b.start(), b.end())
                    else {
                        return 0;
                    };
                    s.draft.set_time_window(TimeWindow::Between {
                        start: a_start.min(b_start),
                        end: a_end.max(b_end),
                    });
                    return consumed;
                }
            }
            if lead == "from" {
                return open_window(s, a, 1 + a_len, |span| {
                    span.start().map(|start| TimeWindow::Since { start })
                });
            }
            0
        }
        "since" | "after" | "before" | "until" | "till" | "through" => {
            let Some((span, len)) = span_at(s, 1) else {
                return 0;
            };
            let window: fn(DateSpan) -> Option<TimeWindow> = match lead {
                "since" => |span| span.start().map(|start| TimeWindow::Since { start }),
                "after" => |span| span.end().map(|start| TimeWindow::Since { start }),
                "before" => |span| span.start().map(|end| TimeWindow::Before { end }),
                _ => |span| span.end().map(|end| TimeWindow::Before { end }),
            };
            open_window(s, span, 1 + len, window)
        }
        "in" | "during" | "for" => {
            let Some((span, len)) = span_at(s, 1) else {
                return 0;
            };
            open_window(s, span, 1 + len, |span| Some(exact(span)))
        }
        _ => {
            let Some((span, len)) = span_at(s, 0) else {
                return 0;
            };
            // A lone out-of-range integer is just a number, not a year.
            let bare_int = matches!(first.kind, TokKind::Int(_));
            if bare_int && !s.options.year_in_range(span.year()) {
                return 0;
            }
            open_window(s, span, len, |span| Some(exact(span)))
        }
    }
}

fn open_window(
    s: &mut Scanner<'_>,
    span: DateSpan,
    consumed: usize,
    window: impl Fn(DateSpan) -> Option<TimeWindow>,
) -> usize {
    if !years_in_range(s, &[span]) {
        return consumed;
    }
    match window(span) {
        Some(window) => {
            s.draft.set_time_window(window);
            consumed
        }
        None => 0,
    }
}

// ============================================================================
// Rule 2: top / bottom / limit
// ============================================================================

fn limit_cue(s: &mut Scanner<'_>) -> usize {
    let count = match s.tok(1).map(|t| &t.kind) {
        Some(TokKind::Int(n)) => Some(*n),
        _ => None,
    };

    let direction = match s.word(0) {
        Some("top" | "best") => Some(SortDir::Desc),
        Some("bottom" | "worst") => Some(SortDir::Asc),
        _ => None,
    };
    if let Some(direction) = direction {
        s.draft.top_direction = Some(direction);
        return match count {
            Some(n) => {
                s.draft.set_limit(n);
                2
            }
            None => 1,
        };
    }

    match (s.word(0), count) {
        (Some("limit" | "first"), Some(n)) => {
            s.draft.set_limit(n);
            2
        }
        _ => 0,
    }
}

// ============================================================================
// Rule 3: filters
// ============================================================================

fn filterable_column(catalog: &Catalog, phrase: &str) -> Option<ColumnRef> {
    let column = catalog.column_by_synonym(phrase)?;
    match catalog.column(&column)?.data_type {
        ColumnType::Text | ColumnType::Numeric => Some(column),
        ColumnType::Date => None,
    }
}

/// Whether the token at `offset` is catalog vocabulary or a cue word.
fn is_reserved(s: &Scanner<'_>, offset: usize) -> bool {
    let Some(word) = s.word(offset) else {
        return false;
    };
    if is_stopword(word) || is_cue_word(word) {
        return true;
    }
    let catalog = s.catalog;
    s.match_phrase(offset, move |p| {
        (catalog.column_by_synonym(p).is_some()
            || catalog.table_by_synonym(p).is_some()
            || catalog.measure_by_synonym(p).is_some()
            || catalog.column_by_known_value(p).is_some())
        .then_some(())
    })
    .is_some()
}

/// One filter operand at `offset`.
fn filter_value(
    s: &Scanner<'_>,
    offset: usize,
    column: &Column,
    free_text: bool,
) -> Option<(FilterValue, usize)> {
    let tok = s.tok(offset)?;

    if column.data_type == ColumnType::Numeric {
        return tok.number().map(|n| (FilterValue::Number(n), 1));
    }

    if let Some((value, len)) = s.match_phrase(offset, |p| column.canonical_value(p)) {
        return Some((FilterValue::Known(value.to_string()), len));
    }

    if !free_text {
        return None;
    }
    let mut words = vec![];
    while let Some(tok) = s.tok(offset + words.len()) {
        if matches!(tok.kind, TokKind::Date(_)) || is_reserved(s, offset + words.len()) {
            break;
        }
        words.push(tok.text.as_str());
    }
    (!words.is_empty()).then(|| (FilterValue::Text(words.join(" ")), words.len()))
}

/// Operands joined by "and", "or" or plain adjacency. Returns the values and the end offset.
fn filter_values(
    s: &Scanner<'_>,
    offset: usize,
    column: &Column,
    free_text: bool,
) -> (Vec<FilterValue>, usize) {
    let mut values = vec![];
    let Some((first, len)) = filter_value(s, offset, column, free_text) else {
        return (values, offset);
    };
    values.push(first);
    let mut at = offset + len;

    loop {
        let skip = usize::from(s.word(at).is_some_and(|w| CONNECTORS.contains(&w)));
        match filter_value(s, at + skip, column, free_text) {
            Some((value, len)) => {
                if !values.contains(&value) {
                    values.push(value);
                }
                at += skip + len;
            }
            None => break,
        }
    }
    (values, at)
}

fn make_filter(column: ColumnRef, values: Vec<FilterValue>) -> Filter {
    let op = if values.len() == 1 {
        FilterOp::Eq
    } else {
        FilterOp::In
    };
    Filter { column, op, values }
}

fn filter_cue(s: &mut Scanner<'_>) -> usize {
    let catalog = s.catalog;
    let lead = usize::from(s.word(0).is_some_and(|w| FILTER_LEADS.contains(&w)));
    let Some((column_ref, column_len)) =
        s.match_phrase(lead, move |p| filterable_column(catalog, p))
    else {
        return 0;
    };
    let Some(column) = catalog.column(&column_ref) else {
        return 0;
    };
    let at = lead + column_len;

    if column.data_type == ColumnType::Numeric {
        let at = at + usize::from(s.is_word(at, "is"));
        if let Some((phrase, op)) = COMPARATORS.iter().find(|(p, _)| s.starts_with(at, p)) {
            if let Some(n) = s.tok(at + phrase.len()).and_then(Tok::number) {
                s.draft.set_filter(Filter {
                    column: column_ref,
                    op: *op,
                    values: vec![FilterValue::Number(n)],
                });
                return at + phrase.len() + 1;
            }
        }
    }

    if s.is_word(at, "in") {
        let (values, end) = filter_values(s, at + 1, column, false);
        if !values.is_empty() {
            s.draft.set_filter(make_filter(column_ref, values));
            return end;
        }
    }

    // Without a lead word, only "<column> is <value>" reads as a filter.
    if lead == 0 && !s.word(at).is_some_and(|w| BARE_COPULAS.contains(&w)) {
        return 0;
    }

    let mut at = at;
    while s.word(at).is_some_and(|w| COPULAS.contains(&w)) {
        at += 1;
    }
    let (values, end) = filter_values(s, at, column, true);
    if values.is_empty() {
        return 0;
    }
    s.draft.set_filter(make_filter(column_ref, values));
    end
}

// ============================================================================
// Rule 4: aggregate cues
// ============================================================================

fn metric_cue(s: &mut Scanner<'_>) -> usize {
    let Some((phrase, aggregate)) = METRIC_CUES.iter().find(|(p, _)| s.starts_with(0, p)) else {
        return 0;
    };
    let cue_len = phrase.len();

    // "total number of orders": "total" defers to the cue after it.
    if s.is_word(0, "total") && METRIC_CUES.iter().any(|(p, _)| s.starts_with(1, p)) {
        return 1;
    }

    if s.draft.metric.is_some() {
        s.draft.warnings.push(super::Ambiguity::IgnoredMetricCue {
            cue: phrase.join(" "),
        });
        return cue_len;
    }

    let catalog = s.catalog;
    let mut at = cue_len;
    while s.word(at).is_some_and(|w| MEASURE_FILLERS.contains(&w)) {
        at += 1;
    }

    let counting = *aggregate == Aggregate::Count;
    let bound = match s.match_phrase(at, move |p| catalog.measure_by_synonym(p)) {
        Some((measure, len)) if counting => Some((
            Measure::Rows {
                table: Some(measure.table.clone()),
            },
            len,
        )),
        Some((measure, len)) => Some((
            Measure::Named {
                name: measure.name.clone(),
            },
            len,
        )),
        None if counting => s
            .match_phrase(at, move |p| catalog.table_by_synonym(p))
            .map(|(table, len)| {
                (
                    Measure::Rows {
                        table: Some(table.name.clone()),
                    },
                    len,
                )
            }),
        None => None,
    };

    match bound {
        Some((measure, len)) => {
            s.draft.metric = Some((*aggregate, Some(measure)));
            at + len
        }
        None => {
            s.draft.metric = Some((*aggregate, None));
            cue_len
        }
    }
}

// ============================================================================
// Rule 5: explicit ordering
// ============================================================================

fn ordering_cue(s: &mut Scanner<'_>) -> usize {
    if let Some((phrase, direction, hint)) =
        DIRECTIONS.iter().find(|(p, _, _)| s.starts_with(0, p))
    {
        s.draft.explicit_direction = Some(*direction);
        if hint.is_some() {
            s.draft.order_hint = *hint;
        }
        return phrase.len();
    }

    let sort_lead = s.word(0).is_some_and(|w| SORT_LEADS.contains(&w));
    if !sort_lead || !s.is_word(1, "by") {
        return 0;
    }

    // "sorted by total sales": the metric words are left for the metric rules.
    let catalog = s.catalog;
    let names_metric = METRIC_CUES.iter().any(|(p, _)| s.starts_with(2, p))
        || s.match_phrase(2, move |p| catalog.measure_by_synonym(p)).is_some();
    if names_metric {
        s.draft.order_metric = true;
        return 2;
    }

    match dimension_at(s, 2) {
        Some((dimension, len)) => {
            s.draft.order_dimension = Some(dimension);
            2 + len
        }
        None => 0,
    }
}

// ============================================================================
// Rule 6: dimensions
// ============================================================================

/// A grouping key at `offset`: a time-bucket word, a text column, or a date column (daily).
fn dimension_at(s: &Scanner<'_>, offset: usize) -> Option<(Dimension, usize)> {
    let catalog = s.catalog;

    if let Some(grain) = s
        .word(offset)
        .and_then(|w| TIME_BUCKETS.iter().find(|(b, _)| *b == w))
        .map(|(_, grain)| *grain)
    {
        let bucket = Dimension::TimeBucket {
            column: catalog.date_column.clone(),
            grain,
        };
        return Some((bucket, 1));
    }

    let (column, len) = s.match_phrase(offset, move |p| catalog.column_by_synonym(p))?;
    let data_type = catalog.column(&column)?.data_type;
    match data_type {
        ColumnType::Text => Some((Dimension::Column { column }, len)),
        ColumnType::Date => Some((
            Dimension::TimeBucket {
                column,
                grain: TimeGrain::Day,
            },
            len,
        )),
        ColumnType::Numeric => None,
    }
}

fn dimension_cue(s: &mut Scanner<'_>) -> usize {
    match dimension_at(s, 0) {
        Some((dimension, len)) => {
            s.draft.add_dimension(dimension);
            len
        }
        None => 0,
    }
}

// ============================================================================
// Rule 7: bare known values
// ============================================================================

fn known_value_cue(s: &mut Scanner<'_>) -> usize {
    let catalog = s.catalog;
    let lookup = move |p: &str| catalog.column_by_known_value(p);

    let Some(((column, first), mut at)) = s.match_phrase(0, lookup) else {
        return 0;
    };
    let mut values = vec![FilterValue::Known(first)];

    loop {
        let skip = usize::from(s.word(at).is_some_and(|w| CONNECTORS.contains(&w)));
        match s.match_phrase(at + skip, lookup) {
            Some(((next_column, value), len)) if next_column == column => {
                let value = FilterValue::Known(value);
                if !values.contains(&value) {
                    values.push(value);
                }
                at += skip + len;
            }
            _ => break,
        }
    }

    s.draft.set_filter(make_filter(column, values));
    at
}

// ============================================================================
// Rule 8: bare measure and entity nouns
// ============================================================================

fn noun_cue(s: &mut Scanner<'_>) -> usize {
    let catalog = s.catalog;

    if let Some((measure, len)) = s.match_phrase(0, move |p| catalog.measure_by_synonym(p)) {
        if s.draft.bare_measure.is_none() {
            s.draft.bare_measure = Some(measure.name.clone());
        }
        return len;
    }

    if let Some((table, len)) = s.match_phrase(0, move |p| catalog.table_by_synonym(p)) {
        if s.draft.subject.is_none() {
            s.draft.subject = Some(table.name.clone());
        }
        return len;
    }

    0
}
