use super::{AnalysisClient, AnalysisProvider, strip_data_uri};
use crate::domain::AnalysisError;
use crate::state::CredentialStore;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Provider double that replays a scripted reply and records what it saw.
struct ScriptedProvider {
    reply: Result<String, String>,
    calls: AtomicUsize,
    last_payload: Mutex<Option<String>>,
    last_prompt: Mutex<Option<String>>,
}

impl ScriptedProvider {
    fn replying(text: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.into()),
            calls: AtomicUsize::new(0),
            last_payload: Mutex::new(None),
            last_prompt: Mutex::new(None),
        })
    }

    fn failing(message: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(message.into()),
            calls: AtomicUsize::new(0),
            last_payload: Mutex::new(None),
            last_prompt: Mutex::new(None),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnalysisProvider for ScriptedProvider {
    async fn generate(
        &self,
        _api_key: &str,
        prompt: &str,
        image_base64: &str,
    ) -> Result<String, AnalysisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
        *self.last_payload.lock().unwrap() = Some(image_base64.to_string());
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(message) => Err(AnalysisError::Transport(message.clone())),
        }
    }
}

fn valid_reply() -> String {
    serde_json::json!({
        "issues": [
            {
                "id": "issue-1",
                "type": "layout",
                "severity": "warning",
                "title": "Misaligned header",
                "description": "Header is off-grid",
                "whyItMatters": "Breaks visual rhythm",
                "location": { "x": 0, "y": 0, "width": 100, "height": 12 },
                "fix": { "css": ".header { margin: 0 auto; }" }
            }
        ],
        "summary": "Minor layout drift",
        "overallScore": 85
    })
    .to_string()
}

fn configured_client(provider: Arc<ScriptedProvider>) -> AnalysisClient {
    let credentials = CredentialStore::new();
    credentials.set("test-key");
    AnalysisClient::new(credentials, provider)
}

#[tokio::test]
async fn test_unconfigured_fails_without_network_call() {
    let provider = ScriptedProvider::replying(valid_reply());
    let client = AnalysisClient::new(CredentialStore::new(), provider.clone());

    let err = client.analyze("AAAA").await.unwrap_err();
    assert!(matches!(err, AnalysisError::Unconfigured));
    assert_eq!(provider.call_count(), 0);
    assert!(!client.is_analyzing());
    assert!(client.error().is_some());
    assert!(client.last_result().is_none());
}

#[tokio::test]
async fn test_success_stores_last_result() {
    let provider = ScriptedProvider::replying(valid_reply());
    let client = configured_client(provider.clone());

    let result = client.analyze("AAAA").await.unwrap();
    assert_eq!(result.issues.len(), 1);
    assert_eq!(provider.call_count(), 1);
    assert!(!client.is_analyzing());
    assert!(client.error().is_none());
    assert_eq!(client.last_result().unwrap(), result);

    let prompt = provider.last_prompt.lock().unwrap().clone().unwrap();
    assert!(prompt.contains("Respond ONLY with valid JSON"));
}

#[tokio::test]
async fn test_data_uri_prefix_is_stripped() {
    let provider = ScriptedProvider::replying(valid_reply());
    let client = configured_client(provider.clone());

    client
        .analyze("data:image/png;base64,QUJDRA==")
        .await
        .unwrap();
    let sent = provider.last_payload.lock().unwrap().clone().unwrap();
    assert_eq!(sent, "QUJDRA==");
}

#[tokio::test]
async fn test_transport_failure_is_mirrored_and_raised() {
    let provider = ScriptedProvider::failing("connection refused");
    let client = configured_client(provider);

    let err = client.analyze("AAAA").await.unwrap_err();
    assert!(matches!(err, AnalysisError::Transport(_)));
    assert!(!client.is_analyzing());
    assert!(client.error().unwrap().contains("connection refused"));
    assert!(client.last_result().is_none());
}

#[tokio::test]
async fn test_unusable_reply_is_a_malformed_result() {
    let provider = ScriptedProvider::replying("I could not find any JSON worth returning.");
    let client = configured_client(provider);

    let err = client.analyze("AAAA").await.unwrap_err();
    assert!(matches!(err, AnalysisError::MalformedResult(_)));
    assert!(!client.is_analyzing());
    assert!(client.error().unwrap().contains("malformed"));
    assert!(client.last_result().is_none());
}

#[tokio::test]
async fn test_set_credential_clears_outstanding_error() {
    let provider = ScriptedProvider::failing("boom");
    let client = configured_client(provider);

    let _ = client.analyze("AAAA").await;
    assert!(client.error().is_some());

    client.set_credential("fresh-key");
    assert!(client.error().is_none());
}

#[test]
fn test_strip_data_uri() {
    assert_eq!(strip_data_uri("data:image/png;base64,QUJD"), "QUJD");
    assert_eq!(strip_data_uri("QUJD"), "QUJD");
    // Only the first comma splits scheme from data.
    assert_eq!(strip_data_uri("a,b,c"), "b,c");
}
