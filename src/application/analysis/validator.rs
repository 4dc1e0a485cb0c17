//! Response validation for the analysis engine.
//!
//! Providers are not contractually guaranteed to return only the structured
//! object: the payload is often wrapped in explanatory prose or markdown
//! fences. The validator extracts the JSON region first, then enforces the
//! result schema strictly. A result that fails any check is rejected as a
//! whole; nothing is coerced or dropped.

use crate::domain::{AnalysisError, AnalysisResult};

/// Parse raw provider text into a typed [`AnalysisResult`].
pub fn validate_response(raw: &str) -> Result<AnalysisResult, AnalysisError> {
    let region = extract_json_region(raw).ok_or_else(|| {
        AnalysisError::MalformedResult("no JSON object found in response text".into())
    })?;

    let result: AnalysisResult = serde_json::from_str(region).map_err(|err| {
        AnalysisError::MalformedResult(format!("response does not match result schema: {err}"))
    })?;

    if result.overall_score > 100 {
        return Err(AnalysisError::MalformedResult(format!(
            "overallScore {} out of range 0..=100",
            result.overall_score
        )));
    }

    Ok(result)
}

/// Longest substring starting at the first `{` and ending at the last `}`.
fn extract_json_region(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}
