//! Text normalization and tokenization.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// `YYYY-MM` or `YYYY-MM-DD`. Bare years are plain integers until a rule claims them.
static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{2})(?:-(\d{2}))?$").unwrap());

/// Lowercase, turn punctuation into spaces, collapse whitespace.
///
/// `-` and `.` survive only between two digits, so `2023-01-15` and `9.99`
/// stay intact while `--`, `;` and quotes disappear. Idempotent.
pub fn normalize(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());

    for (i, &c) in chars.iter().enumerate() {
        if c.is_alphanumeric() {
            // Some lowercase mappings add combining marks; drop them so a second pass is a no-op.
            out.extend(c.to_lowercase().filter(|l| l.is_alphanumeric()));
            continue;
        }
        let between_digits = i > 0
            && chars[i - 1].is_ascii_digit()
            && chars.get(i + 1).is_some_and(|n| n.is_ascii_digit());
        if (c == '-' || c == '.') && between_digits {
            out.push(c);
        } else {
            out.push(' ');
        }
    }

    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A calendar span named by a date token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateSpan {
    Year(i32),
    Month(i32, u32),
    Day(NaiveDate),
}

impl DateSpan {
    pub fn year(&self) -> i32 {
        match *self {
            DateSpan::Year(y) | DateSpan::Month(y, _) => y,
            DateSpan::Day(d) => chrono::Datelike::year(&d),
        }
    }

    /// First day of the span.
    pub fn start(&self) -> Option<NaiveDate> {
        match *self {
            DateSpan::Year(y) => NaiveDate::from_ymd_opt(y, 1, 1),
            DateSpan::Month(y, m) => NaiveDate::from_ymd_opt(y, m, 1),
            DateSpan::Day(d) => Some(d),
        }
    }

    /// First day after the span.
    pub fn end(&self) -> Option<NaiveDate> {
        match *self {
            DateSpan::Year(y) => NaiveDate::from_ymd_opt(y + 1, 1, 1),
            DateSpan::Month(y, 12) => NaiveDate::from_ymd_opt(y + 1, 1, 1),
            DateSpan::Month(y, m) => NaiveDate::from_ymd_opt(y, m + 1, 1),
            DateSpan::Day(d) => d.succ_opt(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokKind {
    Word,
    /// Unsigned integer. Four-digit integers double as years.
    Int(u64),
    /// Decimal number (`9.99`).
    Number(f64),
    /// `YYYY-MM` or `YYYY-MM-DD`, already checked against the calendar.
    Date(DateSpan),
}

/// One token of normalized text.
#[derive(Debug, Clone, PartialEq)]
pub struct Tok {
    pub text: String,
    pub kind: TokKind,
}

impl Tok {
    pub fn is_word(&self, word: &str) -> bool {
        self.kind == TokKind::Word && self.text == word
    }

    /// Numeric value of an integer or decimal token.
    pub fn number(&self) -> Option<f64> {
        match self.kind {
            TokKind::Int(n) => Some(n as f64),
            TokKind::Number(n) => Some(n),
            _ => None,
        }
    }

    /// A four-digit integer read as a year.
    pub fn year(&self) -> Option<i32> {
        match self.kind {
            TokKind::Int(n) if self.text.len() == 4 => i32::try_from(n).ok(),
            _ => None,
        }
    }

    /// The date span this token names: a date token or a four-digit year.
    pub fn date_span(&self) -> Option<DateSpan> {
        match self.kind {
            TokKind::Date(span) => Some(span),
            _ => self.year().map(DateSpan::Year),
        }
    }
}

/// Split already-normalized text into tokens.
pub fn tokenize(normalized: &str) -> Vec<Tok> {
    normalized
        .split_whitespace()
        .map(|text| Tok {
            text: text.to_string(),
            kind: classify(text),
        })
        .collect()
}

fn classify(text: &str) -> TokKind {
    if text.bytes().all(|b| b.is_ascii_digit()) {
        return match text.parse::<u64>() {
            Ok(n) => TokKind::Int(n),
            Err(_) => TokKind::Word,
        };
    }
    if let Some(span) = parse_date(text) {
        return TokKind::Date(span);
    }
    if text.contains('.') {
        if let Ok(n) = text.parse::<f64>() {
            if n.is_finite() {
                return TokKind::Number(n);
            }
        }
    }
    TokKind::Word
}

fn parse_date(text: &str) -> Option<DateSpan> {
    let caps = DATE_PATTERN.captures(text)?;
    let year: i32 = caps.get(1)?.as_str().parse().ok()?;
    let month: u32 = caps.get(2)?.as_str().parse().ok()?;
    match caps.get(3) {
        Some(day) => {
            let day: u32 = day.as_str().parse().ok()?;
            NaiveDate::from_ymd_opt(year, month, day).map(DateSpan::Day)
        }
        None => NaiveDate::from_ymd_opt(year, month, 1).map(|_| DateSpan::Month(year, month)),
    }
}
