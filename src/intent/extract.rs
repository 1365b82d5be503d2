//! Cue dispatcher and intent assembly.

use tracing::debug;

use super::cues::{is_stopword, RULES};
use super::inflection::singularize;
use super::normalize::{normalize, tokenize, Tok, TokKind};
use super::{
    Aggregate, Ambiguity, Dimension, Filter, IntentRecord, Measure, Metric, OrderTarget,
    Ordering, SortDir, TimeWindow,
};
use crate::catalog::Catalog;

/// Knobs for extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Earliest year a date cue may name.
    pub min_year: i32,
    /// Latest year a date cue may name.
    pub max_year: i32,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            min_year: 1900,
            max_year: 2100,
        }
    }
}

impl ExtractOptions {
    pub fn year_in_range(&self, year: i32) -> bool {
        (self.min_year..=self.max_year).contains(&year)
    }
}

/// Read an English question into an [`IntentRecord`] using default options.
///
/// Never fails. Normalization happens here, so
/// `extract_intent(&normalize(t), c) == extract_intent(t, c)`.
pub fn extract_intent(text: &str, catalog: &Catalog) -> IntentRecord {
    extract_intent_with(text, catalog, &ExtractOptions::default())
}

/// Read an English question into an [`IntentRecord`].
pub fn extract_intent_with(text: &str, catalog: &Catalog, options: &ExtractOptions) -> IntentRecord {
    let normalized = normalize(text);
    let toks = tokenize(&normalized);
    let mut scanner = Scanner::new(&toks, catalog, options);

    while scanner.pos < toks.len() {
        let matched = RULES.iter().find_map(|(name, rule)| {
            let consumed = rule(&mut scanner);
            (consumed > 0).then_some((*name, consumed))
        });

        match matched {
            Some((name, consumed)) => {
                debug!(
                    rule = name,
                    at = scanner.pos,
                    text = %toks[scanner.pos..scanner.pos + consumed]
                        .iter()
                        .map(|t| t.text.as_str())
                        .collect::<Vec<_>>()
                        .join(" "),
                    "cue matched"
                );
                scanner.pos += consumed;
            }
            None => {
                let tok = &toks[scanner.pos];
                if !is_stopword(&tok.text) {
                    scanner.draft.warnings.push(Ambiguity::UnrecognizedToken {
                        token: tok.text.clone(),
                    });
                }
                scanner.pos += 1;
            }
        }
    }

    scanner.draft.finish(catalog)
}

// ============================================================================
// Scanner
// ============================================================================

/// Cursor over the token list shared by every cue rule.
///
/// Rules look ahead relative to `pos` and return how many tokens they
/// consumed; a rule returning 0 must leave `draft` untouched.
pub(super) struct Scanner<'a> {
    toks: &'a [Tok],
    pub pos: usize,
    pub catalog: &'a Catalog,
    pub options: &'a ExtractOptions,
    pub draft: Draft,
    max_phrase: usize,
}

impl<'a> Scanner<'a> {
    fn new(toks: &'a [Tok], catalog: &'a Catalog, options: &'a ExtractOptions) -> Self {
        Self {
            toks,
            pos: 0,
            catalog,
            options,
            draft: Draft::default(),
            max_phrase: catalog.max_phrase_words().max(1),
        }
    }

    /// Token at `pos + offset`.
    pub fn tok(&self, offset: usize) -> Option<&'a Tok> {
        self.toks.get(self.pos + offset)
    }

    /// Text of the word token at `pos + offset`.
    pub fn word(&self, offset: usize) -> Option<&'a str> {
        self.tok(offset)
            .filter(|t| t.kind == TokKind::Word)
            .map(|t| t.text.as_str())
    }

    pub fn is_word(&self, offset: usize, word: &str) -> bool {
        self.word(offset) == Some(word)
    }

    /// Whether the words starting at `offset` spell out `phrase`.
    pub fn starts_with(&self, offset: usize, phrase: &[&str]) -> bool {
        phrase
            .iter()
            .enumerate()
            .all(|(i, w)| self.is_word(offset + i, w))
    }

    /// Longest phrase starting at `offset` that `lookup` resolves.
    ///
    /// Each candidate is tried as written, then with its last word singularized.
    pub fn match_phrase<T>(
        &self,
        offset: usize,
        lookup: impl Fn(&str) -> Option<T>,
    ) -> Option<(T, usize)> {
        let start = self.pos + offset;
        let available = self.toks.len().saturating_sub(start);

        for len in (1..=self.max_phrase.min(available)).rev() {
            let span = &self.toks[start..start + len];
            if span.iter().any(|t| t.kind != TokKind::Word) {
                continue;
            }
            let words: Vec<&str> = span.iter().map(|t| t.text.as_str()).collect();
            if let Some(found) = lookup(&words.join(" ")) {
                return Some((found, len));
            }

            let last = words[len - 1];
            let singular = singularize(last);
            if singular != last {
                let mut words = words[..len - 1].to_vec();
                words.push(&singular);
                if let Some(found) = lookup(&words.join(" ")) {
                    return Some((found, len));
                }
            }
        }
        None
    }
}

// ============================================================================
// Draft
// ============================================================================

/// How an ordering word without an explicit target should be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum OrderHint {
    /// Order by the first column dimension.
    Alphabetical,
    /// Order by the first time bucket.
    Chronological,
}

/// Mutable state the rules fill in; frozen into an [`IntentRecord`] by `finish`.
#[derive(Debug, Default)]
pub(super) struct Draft {
    /// First aggregate cue, with the measure bound right after it if any.
    pub metric: Option<(Aggregate, Option<Measure>)>,
    /// First measure noun seen outside an aggregate cue.
    pub bare_measure: Option<String>,
    /// First entity noun seen outside an aggregate cue.
    pub subject: Option<String>,
    pub dimensions: Vec<Dimension>,
    pub filters: Vec<Filter>,
    pub top_direction: Option<SortDir>,
    pub explicit_direction: Option<SortDir>,
    pub order_dimension: Option<Dimension>,
    pub order_metric: bool,
    pub order_hint: Option<OrderHint>,
    pub limit: Option<u64>,
    pub time_window: Option<TimeWindow>,
    pub warnings: Vec<Ambiguity>,
}

impl Draft {
    pub fn add_dimension(&mut self, dimension: Dimension) {
        if !self.dimensions.contains(&dimension) {
            self.dimensions.push(dimension);
        }
    }

    /// Record a filter; a later filter on the same column replaces the earlier one.
    pub fn set_filter(&mut self, filter: Filter) {
        match self.filters.iter_mut().find(|f| f.column == filter.column) {
            Some(existing) => {
                self.warnings.push(Ambiguity::OverwrittenFilter {
                    column: filter.column.clone(),
                });
                *existing = filter;
            }
            None => self.filters.push(filter),
        }
    }

    pub fn set_time_window(&mut self, window: TimeWindow) {
        if let Some(previous) = self.time_window.replace(window) {
            if previous != window {
                self.warnings
                    .push(Ambiguity::OverwrittenTimeWindow { previous });
            }
        }
    }

    pub fn set_limit(&mut self, value: u64) {
        if value == 0 {
            self.warnings.push(Ambiguity::InvalidLimit {
                value: value.to_string(),
            });
        } else {
            self.limit = Some(value);
        }
    }

    fn finish(self, catalog: &Catalog) -> IntentRecord {
        let metric = match (self.metric, self.bare_measure) {
            (Some((aggregate, Some(measure))), _) => Metric { aggregate, measure },
            (Some((Aggregate::Count, None)), _) => Metric {
                aggregate: Aggregate::Count,
                measure: Measure::Rows {
                    table: self.subject,
                },
            },
            (Some((aggregate, None)), bare) => Metric {
                aggregate,
                measure: Measure::Named {
                    name: bare.unwrap_or_else(|| catalog.default_measure.clone()),
                },
            },
            (None, Some(name)) => Metric {
                aggregate: catalog
                    .measure(&name)
                    .map(|m| m.default_aggregate)
                    .unwrap_or(Aggregate::Sum),
                measure: Measure::Named { name },
            },
            (None, None) => Metric {
                aggregate: Aggregate::Count,
                measure: Measure::Rows {
                    table: self.subject,
                },
            },
        };

        let mut dimensions = self.dimensions;
        let target = if let Some(dimension) = self.order_dimension {
            if !dimensions.contains(&dimension) {
                dimensions.push(dimension.clone());
            }
            Some(OrderTarget::Dimension { dimension })
        } else if self.order_metric {
            Some(OrderTarget::Metric)
        } else {
            let hinted = match self.order_hint {
                Some(OrderHint::Alphabetical) => dimensions
                    .iter()
                    .find(|d| matches!(d, Dimension::Column { .. })),
                Some(OrderHint::Chronological) => dimensions
                    .iter()
                    .find(|d| matches!(d, Dimension::TimeBucket { .. })),
                None => None,
            };
            match hinted {
                Some(dimension) => Some(OrderTarget::Dimension {
                    dimension: dimension.clone(),
                }),
                None if self.explicit_direction.is_some() || self.top_direction.is_some() => {
                    Some(OrderTarget::Metric)
                }
                None => None,
            }
        };

        let ordering = target.map(|target| {
            let fallback = match target {
                OrderTarget::Metric => SortDir::Desc,
                OrderTarget::Dimension { .. } => SortDir::Asc,
            };
            Ordering {
                direction: self
                    .explicit_direction
                    .or(self.top_direction)
                    .unwrap_or(fallback),
                target,
            }
        });

        IntentRecord {
            metric,
            dimensions,
            filters: self.filters,
            ordering,
            limit: self.limit,
            time_window: self.time_window,
            warnings: self.warnings,
        }
    }
}
