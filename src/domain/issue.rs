use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier for an issue, unique within a single analysis result.
pub type IssueId = String;

/// Category of a located UI issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueCategory {
    Layout,
    Accessibility,
    Design,
    Performance,
}

impl fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Layout => write!(f, "layout"),
            Self::Accessibility => write!(f, "accessibility"),
            Self::Design => write!(f, "design"),
            Self::Performance => write!(f, "performance"),
        }
    }
}

impl FromStr for IssueCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "layout" => Ok(Self::Layout),
            "accessibility" => Ok(Self::Accessibility),
            "design" => Ok(Self::Design),
            "performance" => Ok(Self::Performance),
            other => Err(format!("unknown issue category: {other}")),
        }
    }
}

/// Severity of an issue.
///
/// Ordered for triage: `Critical > Warning > Suggestion`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Suggestion,
    Warning,
    Critical,
}

impl fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Suggestion => write!(f, "suggestion"),
            Self::Warning => write!(f, "warning"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

impl FromStr for IssueSeverity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "suggestion" => Ok(Self::Suggestion),
            "warning" => Ok(Self::Warning),
            "critical" => Ok(Self::Critical),
            other => Err(format!("unknown issue severity: {other}")),
        }
    }
}

/// Bounding region of an issue, in percentages of the image dimensions.
///
/// Axis-aligned, no rotation. Each value is expected in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IssueLocation {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Suggested code fix, keyed by target surface.
///
/// Zero or more surfaces may carry a snippet; none are required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct IssueFix {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angular: Option<String>,
}

impl IssueFix {
    /// Snippets present on this fix, paired with their surface name.
    pub fn snippets(&self) -> Vec<(&'static str, &str)> {
        [
            ("html", self.html.as_deref()),
            ("css", self.css.as_deref()),
            ("angular", self.angular.as_deref()),
        ]
        .into_iter()
        .filter_map(|(surface, snippet)| snippet.map(|s| (surface, s)))
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.html.is_none() && self.css.is_none() && self.angular.is_none()
    }
}

/// One located, categorized finding in an analyzed screenshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Caller-assigned identifier, unique within the owning result.
    pub id: IssueId,
    /// Category of the finding.
    #[serde(rename = "type")]
    pub category: IssueCategory,
    /// Severity used for triage ordering and filtering.
    pub severity: IssueSeverity,
    /// Short title.
    pub title: String,
    /// What is wrong.
    pub description: String,
    /// Impact on users.
    #[serde(rename = "whyItMatters")]
    pub why_it_matters: String,
    /// Bounding region relative to the image.
    pub location: IssueLocation,
    /// Suggested code changes per target surface.
    pub fix: IssueFix,
}
