//! Domain error types for the analysis engine.
//!
//! Every failure of an analysis call maps to exactly one of these kinds and
//! is both returned to the caller and mirrored into the client's observable
//! error state.

use thiserror::Error;

/// Failure of a single analysis call.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// No credential is held; no request was attempted.
    #[error("API key not configured")]
    Unconfigured,

    /// The provider could not be reached or replied with a failure.
    #[error("analysis request failed: {0}")]
    Transport(String),

    /// The provider replied, but no valid result could be extracted.
    #[error("malformed analysis response: {0}")]
    MalformedResult(String),
}
