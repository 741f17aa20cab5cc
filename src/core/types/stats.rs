use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

/// View count for a single article, as returned by the top articles query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleStat {
    pub title: String,
    pub views: i64,
}

/// Summed views across all articles by one author
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorStat {
    pub name: String,
    pub views: i64,
}

/// A calendar day whose share of non-2xx responses exceeded the threshold
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorDay {
    pub date: NaiveDate,
    pub errors: i64,
    pub requests: i64,
    pub error_rate_percent: f64,
}

impl ErrorDay {
    pub fn new(date: NaiveDate, errors: i64, requests: i64) -> Self {
        let error_rate_percent = if requests > 0 {
            errors as f64 * 100.0 / requests as f64
        } else {
            0.0
        };
        Self {
            date,
            errors,
            requests,
            error_rate_percent,
        }
    }
}

impl fmt::Display for ArticleStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" - {} views", title_case(&self.title), self.views)
    }
}

impl fmt::Display for AuthorStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} article views", self.name, self.views)
    }
}

impl fmt::Display for ErrorDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {:.2}% errors",
            self.date.format("%B %d, %Y"),
            self.error_rate_percent
        )
    }
}

/// Uppercase the first character of every whitespace-separated word and
/// lowercase the rest. Whitespace runs are kept as-is.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for ch in text.chars() {
        if ch.is_whitespace() {
            at_word_start = true;
            out.push(ch);
        } else if at_word_start {
            at_word_start = false;
            out.extend(ch.to_uppercase());
        } else {
            out.extend(ch.to_lowercase());
        }
    }
    out
}
