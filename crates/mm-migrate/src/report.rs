//! Migration run outcome

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write as _;

/// A card the run could not migrate, with enough context for an operator
/// to reconcile it by hand
#[derive(Debug, Clone, Serialize)]
pub struct SkippedCard {
    pub name: String,
    pub reason: String,
}

/// Outcome of one migration run: what was created and what was skipped.
/// A run with skips is still a completed run; the summary never reports a
/// silent partial success.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub dashboards: usize,
    pub migrated: Vec<String>,
    pub skipped: Vec<SkippedCard>,
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}

impl RunReport {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            dashboards: 0,
            migrated: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub(crate) fn record_dashboard(&mut self) {
        self.dashboards += 1;
    }

    pub(crate) fn record_migrated(&mut self, name: String) {
        self.migrated.push(name);
    }

    pub(crate) fn record_skipped(&mut self, name: String, reason: String) {
        self.skipped.push(SkippedCard { name, reason });
    }

    pub(crate) fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn has_skips(&self) -> bool {
        !self.skipped.is_empty()
    }

    fn elapsed_secs(&self) -> f64 {
        let end = self.finished_at.unwrap_or_else(Utc::now);
        (end - self.started_at).num_milliseconds() as f64 / 1000.0
    }

    /// Operator-facing summary, one item per line
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Migrated {} dashboard(s) and {} card(s) in {:.1}s",
            self.dashboards,
            self.migrated.len(),
            self.elapsed_secs()
        );
        if !self.skipped.is_empty() {
            let _ = writeln!(out, "Skipped {} card(s):", self.skipped.len());
            for skip in &self.skipped {
                let _ = writeln!(out, "  - {}: {}", skip.name, skip.reason);
            }
        }
        out
    }
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;
