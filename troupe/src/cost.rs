//! Cost accounting for session results.
//!
//! Engines attach one [`CostEntry`] per billed model call. The reporter sums
//! the totals and formats them as currency; overflow at realistic scales is
//! not a concern.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

/// Token counts for one model call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Tokens in the input/prompt.
    #[serde(default, alias = "prompt_tokens")]
    pub input_tokens: u32,
    /// Tokens in the output/completion.
    #[serde(default, alias = "completion_tokens")]
    pub output_tokens: u32,
    /// Total tokens (input + output).
    #[serde(default)]
    pub total_tokens: u32,
}

impl Usage {
    /// Create a usage record.
    #[must_use]
    pub const fn new(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens: input_tokens + output_tokens,
        }
    }
}

impl Add for Usage {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            input_tokens: self.input_tokens + rhs.input_tokens,
            output_tokens: self.output_tokens + rhs.output_tokens,
            total_tokens: self.total_tokens + rhs.total_tokens,
        }
    }
}

impl AddAssign for Usage {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

/// Billed cost for one model call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostEntry {
    /// Model name the call was billed against.
    pub model: String,
    /// Cost in dollars.
    pub total_cost: f64,
    /// Token breakdown, when the provider reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl CostEntry {
    /// Entry with a dollar total and no token breakdown.
    #[must_use]
    pub fn new(model: impl Into<String>, total_cost: f64) -> Self {
        Self {
            model: model.into(),
            total_cost,
            usage: None,
        }
    }

    /// Attach a token breakdown.
    #[must_use]
    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = Some(usage);
        self
    }
}

/// Sum every entry's total and format as currency.
///
/// An empty sequence yields `"$0.00"`.
#[must_use]
pub fn summarize_cost(entries: &[CostEntry]) -> String {
    format_usd(entries.iter().map(|entry| entry.total_cost).sum())
}

/// Format a dollar amount with two decimal places and thousands separators.
#[must_use]
pub fn format_usd(amount: f64) -> String {
    let cents = (amount * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.abs();
    let frac = cents % 100;

    let digits = (cents / 100).to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}${grouped}.{frac:02}")
}
