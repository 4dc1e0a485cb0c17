use serde::{Deserialize, Serialize};

use super::issue::{Issue, IssueSeverity};

/// Complete structured output of one analysis call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Issues in the order the provider returned them; never re-sorted.
    pub issues: Vec<Issue>,
    /// Brief overall assessment.
    pub summary: String,
    /// Overall score in `[0, 100]`, 100 being perfect.
    #[serde(rename = "overallScore")]
    pub overall_score: u8,
}

impl AnalysisResult {
    /// First issue with the given severity, in result order.
    pub fn first_with_severity(&self, severity: IssueSeverity) -> Option<&Issue> {
        self.issues.iter().find(|i| i.severity == severity)
    }

    /// Number of issues with the given severity, independent of any filter.
    pub fn count_with_severity(&self, severity: IssueSeverity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    /// Whether the result references the given issue id.
    pub fn contains_issue(&self, id: &str) -> bool {
        self.issues.iter().any(|i| i.id == id)
    }
}
