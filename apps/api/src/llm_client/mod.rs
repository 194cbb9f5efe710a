/// LLM Client — the single point of entry for all OpenRouter calls in TalentSift.
///
/// ARCHITECTURAL RULE: No other module may call the OpenRouter API directly.
/// All LLM interactions MUST go through this module.
///
/// Resilience policy: bounded retries with a fixed backoff table for the
/// primary model, then a single attempt per fallback model with a shortened
/// timeout. Total failure surfaces as an `LlmError` — callers decide what a
/// degraded result looks like, this client never fabricates one.
use std::time::{Duration, Instant};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

pub mod prompts;

const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
// OpenRouter attributes traffic by these two headers.
const REFERER: &str = "https://github.com/talentsift/talentsift";
const APP_TITLE: &str = "TalentSift";

pub const DEFAULT_MODEL: &str = "deepseek/deepseek-chat-v3-0324:free";
const MAX_RETRIES: u32 = 3;
// Exponential backoff: 1s, 2s, 4s
const RETRY_DELAYS_MS: [u64; 3] = [1_000, 2_000, 4_000];
const RETRY_STATUS_CODES: [u16; 5] = [429, 500, 502, 503, 504];

/// Tried in order, one attempt each, after the primary model exhausts its
/// retries. All free-tier so a missing key still has a path to a result.
pub const FALLBACK_MODELS: [&str; 4] = [
    "deepseek/deepseek-chat-v3-0324:free",
    "deepseek/deepseek-r1:free",
    "qwen/qwen3-32b:free",
    "google/gemini-2.0-flash-exp:free",
];

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const FALLBACK_TIMEOUT: Duration = Duration::from_secs(15);
const HEALTH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned no choices")]
    EmptyChoices,
}

impl LlmError {
    /// Transport failures and a fixed set of status codes are worth retrying;
    /// everything else (auth errors, bad requests, malformed bodies) is not.
    fn is_retriable(&self) -> bool {
        match self {
            LlmError::Http(_) => true,
            LlmError::Api { status, .. } => is_retriable_status(*status),
            _ => false,
        }
    }
}

/// Generation parameters forwarded verbatim in the request body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelParams {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.3,
            max_tokens: 2000,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// A successful completion, tagged with the model that actually produced it
/// (which differs from the requested model after a fallback).
#[derive(Debug, Clone)]
pub struct Completion {
    pub content: String,
    pub model: String,
}

/// Result of a lightweight connectivity probe against the API.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub http_status: Option<u16>,
    pub latency_ms: Option<u64>,
    pub error: Option<String>,
}

/// The single LLM client used by all services in TalentSift.
/// Wraps the OpenRouter chat-completions API with retry and fallback logic.
#[derive(Clone, Default)]
pub struct LlmClient {
    http: reqwest::Client,
}

impl LlmClient {
    pub fn new() -> Self {
        // Timeouts are set per request: the primary, fallback, and health
        // paths each use a different budget.
        Self {
            http: reqwest::Client::new(),
        }
    }

    /// One POST to the chat-completions endpoint. No retries here.
    async fn request_once(
        &self,
        model: &str,
        params: &ModelParams,
        system: &str,
        user: &str,
        api_key: Option<&str>,
        timeout: Duration,
    ) -> Result<String, LlmError> {
        let body = ChatRequest {
            model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: params.temperature,
            max_tokens: params.max_tokens,
        };

        let mut request = self
            .http
            .post(OPENROUTER_API_URL)
            .header("Content-Type", "application/json")
            .header("HTTP-Referer", REFERER)
            .header("X-Title", APP_TITLE)
            .timeout(timeout)
            .json(&body);

        if let Some(key) = api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| truncate(&text, 200));
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let chat: ChatResponse = response.json().await?;
        let content = chat
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(LlmError::EmptyChoices)?;

        debug!(model, "chat completion succeeded");
        Ok(content)
    }

    /// Calls one model with up to `MAX_RETRIES` attempts, sleeping through the
    /// backoff table between retriable failures.
    async fn complete(
        &self,
        model: &str,
        params: &ModelParams,
        system: &str,
        user: &str,
        api_key: Option<&str>,
        timeout: Duration,
    ) -> Result<String, LlmError> {
        let mut attempt = 1;
        loop {
            match self
                .request_once(model, params, system, user, api_key, timeout)
                .await
            {
                Ok(content) => {
                    if attempt > 1 {
                        info!(model, attempt, "chat completion recovered after retry");
                    }
                    return Ok(content);
                }
                Err(e) if e.is_retriable() && attempt < MAX_RETRIES => {
                    let delay = retry_delay(attempt);
                    warn!(
                        model,
                        attempt,
                        max = MAX_RETRIES,
                        "chat completion failed ({e}), retrying in {}ms",
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// The full resilience path: primary model with retries, then the static
    /// fallback chain with a single shortened-timeout attempt per model.
    /// Returns the error from the primary model if every strategy fails.
    pub async fn complete_with_fallback(
        &self,
        params: &ModelParams,
        system: &str,
        user: &str,
        api_key: Option<&str>,
    ) -> Result<Completion, LlmError> {
        match self
            .complete(&params.model, params, system, user, api_key, REQUEST_TIMEOUT)
            .await
        {
            Ok(content) => Ok(Completion {
                content,
                model: params.model.clone(),
            }),
            Err(primary_err) => {
                warn!(
                    model = %params.model,
                    "primary model exhausted retries ({primary_err}), starting fallback chain"
                );

                for fallback in fallback_candidates(&params.model) {
                    info!(model = fallback, "trying fallback model");
                    match self
                        .request_once(fallback, params, system, user, api_key, FALLBACK_TIMEOUT)
                        .await
                    {
                        Ok(content) => {
                            info!(model = fallback, "fallback model succeeded");
                            return Ok(Completion {
                                content,
                                model: fallback.to_string(),
                            });
                        }
                        Err(e) => {
                            warn!(model = fallback, "fallback model failed: {e}");
                        }
                    }
                }

                Err(primary_err)
            }
        }
    }

    /// Sends a minimal completion to verify connectivity and measure latency.
    /// Without an API key the probe is skipped: OpenRouter rejects anonymous
    /// requests, so an unauthenticated check would only report noise.
    pub async fn health_check(&self, model: &str, api_key: Option<&str>) -> HealthReport {
        let Some(key) = api_key else {
            return HealthReport {
                status: "unconfigured",
                http_status: None,
                latency_ms: None,
                error: Some("an API key is required for the health check".to_string()),
            };
        };

        let body = ChatRequest {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content: "Hello",
            }],
            temperature: 0.0,
            max_tokens: 10,
        };

        let started = Instant::now();
        let result = self
            .http
            .post(OPENROUTER_API_URL)
            .header("Content-Type", "application/json")
            .header("HTTP-Referer", REFERER)
            .header("X-Title", APP_TITLE)
            .timeout(HEALTH_TIMEOUT)
            .bearer_auth(key)
            .json(&body)
            .send()
            .await;
        let latency_ms = started.elapsed().as_millis() as u64;

        match result {
            Ok(response) => {
                let code = response.status().as_u16();
                HealthReport {
                    status: if response.status().is_success() {
                        "healthy"
                    } else {
                        "unhealthy"
                    },
                    http_status: Some(code),
                    latency_ms: Some(latency_ms),
                    error: None,
                }
            }
            Err(e) => HealthReport {
                status: "unhealthy",
                http_status: None,
                latency_ms: Some(latency_ms),
                error: Some(e.to_string()),
            },
        }
    }
}

/// Parses a JSON payload out of completion text, tolerating markdown fences.
pub fn parse_json_payload<T: DeserializeOwned>(content: &str) -> Result<T, LlmError> {
    serde_json::from_str(strip_json_fences(content)).map_err(LlmError::Parse)
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

fn is_retriable_status(status: u16) -> bool {
    RETRY_STATUS_CODES.contains(&status)
}

/// Delay before the retry that follows `attempt` (1-based). Attempts past
/// the table reuse its last entry.
fn retry_delay(attempt: u32) -> Duration {
    let idx = (attempt as usize - 1).min(RETRY_DELAYS_MS.len() - 1);
    Duration::from_millis(RETRY_DELAYS_MS[idx])
}

/// Fallback models to try after `primary` fails. A primary that is itself
/// one of the fallback models gets no second pass through the chain.
fn fallback_candidates(primary: &str) -> Vec<&'static str> {
    if FALLBACK_MODELS.contains(&primary) {
        return Vec::new();
    }
    FALLBACK_MODELS.to_vec()
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_unterminated_fence() {
        let input = "```json\n{\"key\": 1}";
        assert_eq!(strip_json_fences(input), "{\"key\": 1}");
    }

    #[test]
    fn test_retriable_status_codes() {
        for status in [429, 500, 502, 503, 504] {
            assert!(is_retriable_status(status), "{status} should retry");
        }
        for status in [400, 401, 403, 404, 422] {
            assert!(!is_retriable_status(status), "{status} should not retry");
        }
    }

    #[test]
    fn test_retry_delay_table() {
        assert_eq!(retry_delay(1), Duration::from_secs(1));
        assert_eq!(retry_delay(2), Duration::from_secs(2));
        assert_eq!(retry_delay(3), Duration::from_secs(4));
        // Past the table, the last delay is reused.
        assert_eq!(retry_delay(7), Duration::from_secs(4));
    }

    #[test]
    fn test_fallback_candidates_for_custom_model() {
        let chain = fallback_candidates("anthropic/claude-3-5-sonnet");
        assert_eq!(chain.len(), FALLBACK_MODELS.len());
        assert_eq!(chain[0], "deepseek/deepseek-chat-v3-0324:free");
        assert_eq!(chain[3], "google/gemini-2.0-flash-exp:free");
    }

    #[test]
    fn test_fallback_chain_not_reentered_for_fallback_model() {
        assert!(fallback_candidates("deepseek/deepseek-r1:free").is_empty());
        assert!(fallback_candidates(DEFAULT_MODEL).is_empty());
    }

    #[test]
    fn test_api_error_is_retriable_only_for_listed_statuses() {
        let rate_limited = LlmError::Api {
            status: 429,
            message: "rate limited".to_string(),
        };
        assert!(rate_limited.is_retriable());

        let unauthorized = LlmError::Api {
            status: 401,
            message: "missing key".to_string(),
        };
        assert!(!unauthorized.is_retriable());

        let empty = LlmError::EmptyChoices;
        assert!(!empty.is_retriable());
    }

    #[test]
    fn test_chat_response_deserializes_openrouter_shape() {
        let raw = r#"{
            "id": "gen-123",
            "choices": [
                {"message": {"role": "assistant", "content": "{\"ok\": true}"}}
            ]
        }"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.choices[0].message.content, "{\"ok\": true}");
    }

    #[test]
    fn test_chat_request_serializes_expected_fields() {
        let request = ChatRequest {
            model: DEFAULT_MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: "hi",
            }],
            temperature: 0.5,
            max_tokens: 2000,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], DEFAULT_MODEL);
        assert_eq!(value["temperature"], 0.5);
        assert_eq!(value["max_tokens"], 2000);
        assert_eq!(value["messages"][0]["role"], "user");
    }

    #[test]
    fn test_model_params_defaults() {
        let params = ModelParams::default();
        assert_eq!(params.model, DEFAULT_MODEL);
        assert!((params.temperature - 0.3).abs() < f32::EPSILON);
        assert_eq!(params.max_tokens, 2000);
    }

    #[test]
    fn test_parse_json_payload_through_fences() {
        #[derive(Deserialize)]
        struct Payload {
            score: f64,
        }
        let payload: Payload = parse_json_payload("```json\n{\"score\": 8.5}\n```").unwrap();
        assert!((payload.score - 8.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_json_payload_rejects_garbage() {
        let result: Result<serde_json::Value, _> = parse_json_payload("not json at all");
        assert!(result.is_err());
    }
}
