//! Fixed instruction prompt sent with every analysis request.

/// Demands JSON-only output matching the analysis result schema.
pub const ANALYSIS_PROMPT: &str = include_str!("analysis_prompt.txt");
