//! Analysis orchestration for uitriage.
//! Owns the request lifecycle around the external multimodal provider:
//! credential gating, payload preparation, validation, and the observable
//! analyzing/error/last-result state a front-end renders from.

pub mod validator;

#[cfg(test)]
mod tests;

use crate::domain::{AnalysisError, AnalysisResult};
use crate::prompts::ANALYSIS_PROMPT;
use crate::state::CredentialStore;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Transport seam to the external multimodal service.
///
/// Implementations send one request carrying the instruction prompt and the
/// PNG payload and return the raw model text. The production implementation
/// lives in `infra::gemini`; tests substitute a scripted provider.
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    async fn generate(
        &self,
        api_key: &str,
        prompt: &str,
        image_base64: &str,
    ) -> Result<String, AnalysisError>;
}

/// Orchestrates one analysis call at a time against a provider.
///
/// Callers are expected to serialize calls; concurrent calls are not
/// rejected, but derived state only stays coherent when requests do not
/// overlap.
pub struct AnalysisClient {
    credentials: CredentialStore,
    provider: Arc<dyn AnalysisProvider>,
    analyzing: AtomicBool,
    error: RwLock<Option<String>>,
    last_result: RwLock<Option<AnalysisResult>>,
}

impl AnalysisClient {
    pub fn new(credentials: CredentialStore, provider: Arc<dyn AnalysisProvider>) -> Self {
        Self {
            credentials,
            provider,
            analyzing: AtomicBool::new(false),
            error: RwLock::new(None),
            last_result: RwLock::new(None),
        }
    }

    /// Replace the credential and clear any outstanding error.
    ///
    /// Takes effect for the next request; an in-flight request keeps the key
    /// it was started with.
    pub fn set_credential(&self, value: impl Into<String>) {
        self.credentials.set(value);
        *self.error.write() = None;
    }

    /// Whether a request is currently in flight.
    pub fn is_analyzing(&self) -> bool {
        self.analyzing.load(Ordering::SeqCst)
    }

    /// Error message of the most recent failed call, if any.
    pub fn error(&self) -> Option<String> {
        self.error.read().clone()
    }

    /// Result of the most recent successful call, if any.
    pub fn last_result(&self) -> Option<AnalysisResult> {
        self.last_result.read().clone()
    }

    /// Run one analysis of the given image payload.
    ///
    /// The payload may be raw base64 or a data URI; a leading scheme prefix
    /// is stripped before sending. Exactly one of the error state or the
    /// last result is updated per call, and `is_analyzing()` is false once
    /// the call settles, on every exit path.
    pub async fn analyze(&self, image: &str) -> Result<AnalysisResult, AnalysisError> {
        if !self.credentials.is_configured() {
            let err = AnalysisError::Unconfigured;
            *self.error.write() = Some(err.to_string());
            return Err(err);
        }
        // is_configured() guarantees a non-empty key.
        let api_key = self.credentials.get().unwrap_or_default();

        self.analyzing.store(true, Ordering::SeqCst);
        *self.error.write() = None;

        let payload = strip_data_uri(image);
        log::debug!("sending analysis request ({} base64 bytes)", payload.len());

        let outcome = match self.provider.generate(&api_key, ANALYSIS_PROMPT, payload).await {
            Ok(raw) => validator::validate_response(&raw),
            Err(err) => Err(err),
        };

        self.analyzing.store(false, Ordering::SeqCst);

        match outcome {
            Ok(result) => {
                log::info!(
                    "analysis completed: {} issues, score {}",
                    result.issues.len(),
                    result.overall_score
                );
                *self.last_result.write() = Some(result.clone());
                Ok(result)
            }
            Err(err) => {
                log::warn!("analysis failed: {err}");
                *self.error.write() = Some(err.to_string());
                Err(err)
            }
        }
    }
}

/// Drop a leading data-URI scheme prefix if present.
///
/// Only the portion after the first comma is sent when a comma exists.
fn strip_data_uri(payload: &str) -> &str {
    match payload.split_once(',') {
        Some((_, data)) => data,
        None => payload,
    }
}
