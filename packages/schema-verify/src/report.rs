use serde::Serialize;
use tracing::debug;

use crate::checks::Check;
use crate::error::CheckError;

#[derive(Debug)]
pub struct CheckOutcome {
    pub check: Check,
    pub error: Option<CheckError>,
}

impl CheckOutcome {
    pub fn passed(&self) -> bool {
        self.error.is_none()
    }

    /// `✅ <name>` or `❌ <name>: <message>`
    pub fn line(&self) -> String {
        match &self.error {
            None => format!("✅ {}", self.check.name()),
            Some(e) => format!("❌ {}: {e}", self.check.name()),
        }
    }
}

/// Outcomes of one run, in the order the checks ran.
#[derive(Debug, Default)]
pub struct Report {
    outcomes: Vec<CheckOutcome>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, check: Check, result: Result<(), CheckError>) {
        match &result {
            Ok(()) => debug!(check = check.name(), "check=passed"),
            Err(e) => debug!(check = check.name(), error = %e, "check=failed"),
        }
        self.outcomes.push(CheckOutcome {
            check,
            error: result.err(),
        });
    }

    pub fn outcomes(&self) -> &[CheckOutcome] {
        &self.outcomes
    }

    pub fn outcome(&self, check: Check) -> Option<&CheckOutcome> {
        self.outcomes.iter().find(|o| o.check == check)
    }

    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed()).count()
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_success(&self) -> bool {
        self.passed() == self.total()
    }

    pub fn summary_line(&self) -> String {
        format!("📊 Test Results: {}/{} passed", self.passed(), self.total())
    }

    /// Per-check lines, a blank line, then the summary.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for outcome in &self.outcomes {
            out.push_str(&outcome.line());
            out.push('\n');
        }
        out.push('\n');
        out.push_str(&self.summary_line());
        out
    }

    /// Serializable view for machine-readable output
    pub fn summary(&self) -> ReportSummary<'_> {
        ReportSummary {
            passed: self.passed(),
            total: self.total(),
            success: self.is_success(),
            checks: self
                .outcomes
                .iter()
                .map(|o| CheckSummary {
                    id: o.check,
                    name: o.check.name(),
                    passed: o.passed(),
                    message: o.error.as_ref().map(ToString::to_string),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReportSummary<'a> {
    pub passed: usize,
    pub total: usize,
    pub success: bool,
    pub checks: Vec<CheckSummary<'a>>,
}

#[derive(Debug, Serialize)]
pub struct CheckSummary<'a> {
    pub id: Check,
    pub name: &'a str,
    pub passed: bool,
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn missing_db() -> CheckError {
        CheckError::DatabaseMissing {
            name: "university".into(),
        }
    }

    #[test]
    fn test_passing_check_counts_once_in_both_counters() {
        let mut report = Report::new();
        report.record(Check::SeedData, Ok(()));
        assert_eq!((report.passed(), report.total()), (1, 1));
    }

    #[test]
    fn test_failing_check_counts_only_in_total() {
        let mut report = Report::new();
        report.record(Check::DatabaseExists, Err(missing_db()));
        assert_eq!((report.passed(), report.total()), (0, 1));
        assert!(!report.is_success());
    }

    #[test]
    fn test_all_passing_is_success() {
        let mut report = Report::new();
        for check in Check::ALL {
            report.record(check, Ok(()));
        }
        assert_eq!(report.passed(), 7);
        assert!(report.is_success());
        assert_eq!(report.summary_line(), "📊 Test Results: 7/7 passed");
    }

    #[test]
    fn test_render_text() {
        let mut report = Report::new();
        report.record(Check::DatabaseExists, Err(missing_db()));
        report.record(Check::TablesExist, Ok(()));

        assert_eq!(
            report.render_text(),
            "❌ Database 'university' exists: Database 'university' does not exist\n\
             ✅ Required tables exist\n\
             \n\
             📊 Test Results: 1/2 passed"
        );
    }

    #[test]
    fn test_outcome_lookup() {
        let mut report = Report::new();
        report.record(Check::TablesExist, Ok(()));
        assert!(report.outcome(Check::TablesExist).unwrap().passed());
        assert!(report.outcome(Check::Constraints).is_none());
    }

    #[test]
    fn test_summary_serializes() {
        let mut report = Report::new();
        report.record(Check::DatabaseExists, Err(missing_db()));
        report.record(Check::TablesExist, Ok(()));

        let value = serde_json::to_value(report.summary()).unwrap();
        assert_eq!(
            value,
            json!({
                "passed": 1,
                "total": 2,
                "success": false,
                "checks": [
                    {
                        "id": "database_exists",
                        "name": "Database 'university' exists",
                        "passed": false,
                        "message": "Database 'university' does not exist"
                    },
                    {
                        "id": "tables_exist",
                        "name": "Required tables exist",
                        "passed": true,
                        "message": null
                    }
                ]
            })
        );
    }
}
