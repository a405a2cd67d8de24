//! Numbering template formatter.
//!
//! Supported placeholders:
//!
//! | placeholder | replaced by |
//! |---|---|
//! | `{YYYY}` / `{YY}` | year, four or two digits |
//! | `{MM}` / `{DD}` | zero-padded month / day |
//! | `{D}` | day without leading zero |
//! | `{000…}` | counter padded to the run length (first run only) |
//! | `{NUMBER:N}` | counter padded to `N` |
//! | `{NUMBER}` | counter padded to the first run of `0` in the template, else 3 |
//!
//! Counters wider than their padding are never truncated.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

/// Padding used by `{NUMBER}` when the template has no zero run.
pub const DEFAULT_PADDING: usize = 3;

/// Upper bound on any requested padding.
const MAX_PADDING: usize = 32;

static ZERO_RUN_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{0+\}").expect("zero run pattern is valid"));

static NUMBER_WIDTH_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{NUMBER:(\d+)\}").expect("number width pattern is valid"));

static ZERO_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"0+").expect("zero pattern is valid"));

/// A numbering template such as `INV-{YYYY}-{0000}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTemplate<'a> {
    template: &'a str,
}

impl<'a> CodeTemplate<'a> {
    /// Wraps a raw template string.
    #[must_use]
    pub fn new(template: &'a str) -> Self {
        Self { template }
    }

    /// Renders the template for `number` on `date`.
    #[must_use]
    pub fn render(&self, number: i64, date: NaiveDate) -> String {
        let mut generated = self
            .template
            .replace("{YYYY}", &format!("{:04}", date.year()))
            .replace("{YY}", &format!("{:02}", date.year().rem_euclid(100)))
            .replace("{MM}", &format!("{:02}", date.month()))
            .replace("{DD}", &format!("{:02}", date.day()))
            .replace("{D}", &date.day().to_string());

        if let Some(found) = ZERO_RUN_PLACEHOLDER.find(&generated) {
            let placeholder = found.as_str().to_string();
            let width = placeholder.len() - 2;
            generated = generated.replace(&placeholder, &pad(number, width));
        }

        if let Some(captures) = NUMBER_WIDTH_PLACEHOLDER.captures(&generated) {
            let placeholder = captures[0].to_string();
            if let Ok(width) = captures[1].parse::<usize>() {
                generated = generated.replace(&placeholder, &pad(number, width));
            }
        }

        if generated.contains("{NUMBER}") {
            generated = generated.replace("{NUMBER}", &pad(number, self.default_padding()));
        }

        generated
    }

    /// Length of the first run of `0` in the raw template, else [`DEFAULT_PADDING`].
    #[must_use]
    pub fn default_padding(&self) -> usize {
        ZERO_RUN
            .find(self.template)
            .map_or(DEFAULT_PADDING, |run| run.as_str().len())
    }
}

fn pad(number: i64, width: usize) -> String {
    let width = width.min(MAX_PADDING);
    format!("{number:0>width$}")
}
