//! Shared state for uitriage.
//! The credential cell is injected into the analysis client; the view-state
//! store owns everything a front-end renders from and recomputes its derived
//! values from primitive state on every read.

use crate::domain::{AnalysisResult, Issue, IssueSeverity};
use parking_lot::RwLock;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Holds the access credential for the external analysis service.
///
/// Explicitly owned and cloned into whoever needs it; replacement takes
/// effect for the next request. Persistence is the config collaborator's
/// job, not this cell's.
#[derive(Clone, Default)]
pub struct CredentialStore {
    key: Arc<RwLock<Option<String>>>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, value: impl Into<String>) {
        *self.key.write() = Some(value.into());
    }

    /// True iff a non-empty credential is currently held.
    pub fn is_configured(&self) -> bool {
        self.key.read().as_deref().is_some_and(|k| !k.is_empty())
    }

    pub fn get(&self) -> Option<String> {
        self.key.read().clone().filter(|k| !k.is_empty())
    }
}

/// View-level predicate restricting displayed issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeverityFilter {
    #[default]
    All,
    Critical,
    Warning,
}

impl SeverityFilter {
    /// Severity this filter matches, or `None` for all.
    fn severity(self) -> Option<IssueSeverity> {
        match self {
            Self::All => None,
            Self::Critical => Some(IssueSeverity::Critical),
            Self::Warning => Some(IssueSeverity::Warning),
        }
    }
}

impl fmt::Display for SeverityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Critical => write!(f, "critical"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

impl FromStr for SeverityFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "critical" => Ok(Self::Critical),
            "warning" => Ok(Self::Warning),
            other => Err(format!("unknown severity filter: {other}")),
        }
    }
}

/// Primitive view state plus derived values over the latest result.
///
/// Mutated only through its own operations, by a single logical owner.
#[derive(Default)]
pub struct ViewStateStore {
    image: Option<String>,
    result: Option<AnalysisResult>,
    selected_issue_id: Option<String>,
    filter: SeverityFilter,
    generation: u64,
}

impl ViewStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    pub fn selected_issue_id(&self) -> Option<&str> {
        self.selected_issue_id.as_deref()
    }

    pub fn filter(&self) -> SeverityFilter {
        self.filter
    }

    /// Token identifying the current image epoch.
    ///
    /// Snapshot it before starting an analysis and pass it to
    /// [`apply_result_at`](Self::apply_result_at) so a response that
    /// outlives its image cannot overwrite newer state.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Issues visible under the active filter, in result order.
    pub fn filtered_issues(&self) -> Vec<&Issue> {
        let Some(result) = self.result.as_ref() else {
            return Vec::new();
        };
        match self.filter.severity() {
            None => result.issues.iter().collect(),
            Some(severity) => result
                .issues
                .iter()
                .filter(|i| i.severity == severity)
                .collect(),
        }
    }

    /// Critical issues in the unfiltered result.
    pub fn critical_count(&self) -> usize {
        self.result
            .as_ref()
            .map(|r| r.count_with_severity(IssueSeverity::Critical))
            .unwrap_or(0)
    }

    /// Warning issues in the unfiltered result.
    pub fn warning_count(&self) -> usize {
        self.result
            .as_ref()
            .map(|r| r.count_with_severity(IssueSeverity::Warning))
            .unwrap_or(0)
    }

    /// Load a new image: clears result and selection, resets the filter,
    /// and starts a new generation.
    pub fn select_image(&mut self, image: impl Into<String>) {
        self.image = Some(image.into());
        self.result = None;
        self.selected_issue_id = None;
        self.filter = SeverityFilter::All;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Store a fresh result, auto-selecting the first critical issue if any.
    ///
    /// When no issue is critical the selection is left as it was.
    pub fn apply_result(&mut self, result: AnalysisResult) {
        if let Some(first_critical) = result.first_with_severity(IssueSeverity::Critical) {
            self.selected_issue_id = Some(first_critical.id.clone());
        }
        self.result = Some(result);
    }

    /// Generation-guarded variant of [`apply_result`](Self::apply_result).
    ///
    /// Returns `false` and leaves all state untouched when the token is
    /// stale, i.e. the image changed while the analysis was in flight.
    pub fn apply_result_at(&mut self, generation: u64, result: AnalysisResult) -> bool {
        if generation != self.generation {
            log::debug!(
                "discarding stale analysis result (generation {generation}, current {})",
                self.generation
            );
            return false;
        }
        self.apply_result(result);
        true
    }

    /// Toggle the single selection.
    ///
    /// Selecting an id clears any previous selection; an id absent from the
    /// current result is inert.
    pub fn toggle_selection(&mut self, id: &str) {
        if self.selected_issue_id.as_deref() == Some(id) {
            self.selected_issue_id = None;
            return;
        }
        let known = self.result.as_ref().is_some_and(|r| r.contains_issue(id));
        if known {
            self.selected_issue_id = Some(id.to_string());
        }
    }

    /// Replace the active filter. Never touches the selection, so a selected
    /// issue may be absent from `filtered_issues()`.
    pub fn set_filter(&mut self, filter: SeverityFilter) {
        self.filter = filter;
    }

    /// Clear everything and start a new generation.
    pub fn reset(&mut self) {
        self.image = None;
        self.result = None;
        self.selected_issue_id = None;
        self.filter = SeverityFilter::All;
        self.generation = self.generation.wrapping_add(1);
    }
}
