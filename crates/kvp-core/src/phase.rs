//! Typed payloads for the four PDCA phases.

use crate::error::{KvpError, Result};
use crate::progress::improvement_percent;
use crate::task::Task;
use serde::{Deserialize, Serialize};

/// Split multi-line input into trimmed, non-blank lines, preserving order.
pub fn split_non_empty_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a user-supplied metric value. Only finite numbers are accepted.
pub fn parse_metric(s: &str) -> Result<f64> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|_| KvpError::Validation(format!("metric '{s}' is not a number")))?;
    if !value.is_finite() {
        return Err(KvpError::Validation(format!("metric '{s}' is not finite")));
    }
    Ok(value)
}

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct Plan {
    pub problem: String,
    pub goal: String,
    pub root_cause: String,
    pub measures: Vec<String>,
}

impl Plan {
    pub fn set_measures_text(&mut self, text: &str) {
        self.measures = split_non_empty_lines(text);
    }

    pub fn measures_text(&self) -> String {
        self.measures.join("\n")
    }
}

// ---------------------------------------------------------------------------
// Do
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct Do {
    pub implementation_steps: Vec<Task>,
}

// ---------------------------------------------------------------------------
// Check
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct Metrics {
    pub before: f64,
    pub after: f64,
    pub improvement_percent: f64,
}

impl Metrics {
    pub fn new(before: f64, after: f64) -> Self {
        Self {
            before,
            after,
            improvement_percent: improvement_percent(before, after),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct Check {
    pub metrics: Metrics,
    pub results: String,
}

impl Check {
    /// Replace both metric values; the improvement is recomputed every time.
    pub fn set_metrics(&mut self, before: f64, after: f64) {
        self.metrics = Metrics::new(before, after);
    }

    pub fn set_before(&mut self, before: f64) {
        self.set_metrics(before, self.metrics.after);
    }

    pub fn set_after(&mut self, after: f64) {
        self.set_metrics(self.metrics.before, after);
    }
}

// ---------------------------------------------------------------------------
// Act
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct Act {
    pub standardization: String,
    pub lessons_learned: String,
    pub next_steps: String,
}
