//! HTTP client for the generative-AI `generateContent` endpoint.

use std::time::Duration;

use serde_json::json;
use wastewise_core::verification::{parse_verification, VerificationError, VerificationResult};

/// The fixed analysis prompt. The response contract (`wasteType`,
/// `quantity`, `confidence`) must stay in sync with
/// [`wastewise_core::verification`].
const WASTE_ANALYSIS_PROMPT: &str = "\
You are an expert in waste management and recycling. Analyze this image and provide:
1. The type of waste (e.g. plastic, paper, glass, metal, organic)
2. An estimate of the quantity or amount (in kg or liters)
3. Your confidence level in this assessment (as a percentage)

Respond in JSON format like this:
{
    \"wasteType\": \"type of waste\",
    \"quantity\": \"estimated quantity with unit\",
    \"confidence\": confidence level as a number between 0 and 1
}";

/// Default model used for classification.
const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Default API base URL.
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default request timeout in seconds. A classification call with no
/// timeout can stall a submission flow indefinitely.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the classification client.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// API key sent as a query parameter.
    pub api_key: String,
    /// Model name, e.g. `gemini-1.5-flash`.
    pub model: String,
    /// API base URL (overridable for tests and proxies).
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl ClassifierConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                   | Required | Default                                    |
    /// |---------------------------|----------|--------------------------------------------|
    /// | `CLASSIFIER_API_KEY`      | **yes**  | --                                         |
    /// | `CLASSIFIER_MODEL`        | no       | `gemini-1.5-flash`                         |
    /// | `CLASSIFIER_BASE_URL`     | no       | `https://generativelanguage.googleapis.com`|
    /// | `CLASSIFIER_TIMEOUT_SECS` | no       | `30`                                       |
    ///
    /// # Panics
    ///
    /// Panics if `CLASSIFIER_API_KEY` is not set.
    pub fn from_env() -> Self {
        let api_key = std::env::var("CLASSIFIER_API_KEY")
            .expect("CLASSIFIER_API_KEY must be set in the environment");

        let model =
            std::env::var("CLASSIFIER_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let base_url =
            std::env::var("CLASSIFIER_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let timeout_secs: u64 = std::env::var("CLASSIFIER_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
            .parse()
            .expect("CLASSIFIER_TIMEOUT_SECS must be a valid u64");

        Self {
            api_key,
            model,
            base_url,
            timeout_secs,
        }
    }
}

/// Errors from a classification attempt.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    /// Transport-level failure (connect, timeout, TLS).
    #[error("Classification request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("Classification service returned {status}: {body}")]
    Api { status: u16, body: String },

    /// The response carried no candidate text to parse.
    #[error("Classification response contained no text")]
    EmptyResponse,

    /// The candidate text did not parse as a verification result.
    #[error(transparent)]
    Verification(#[from] VerificationError),
}

/// Client for one classification service endpoint.
pub struct ClassifierClient {
    http: reqwest::Client,
    config: ClassifierConfig,
}

impl ClassifierClient {
    /// Build a client with a per-request timeout from the configuration.
    pub fn new(config: ClassifierConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { http, config })
    }

    /// Classify an inline image.
    ///
    /// * `mime_type`   - e.g. `image/jpeg`.
    /// * `base64_data` - the raw image bytes, base64-encoded, without a
    ///   `data:` URL prefix.
    pub async fn classify(
        &self,
        mime_type: &str,
        base64_data: &str,
    ) -> Result<VerificationResult, ClassifierError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.config.base_url, self.config.model, self.config.api_key
        );

        let body = json!({
            "contents": [{
                "parts": [
                    { "text": WASTE_ANALYSIS_PROMPT },
                    { "inline_data": { "mime_type": mime_type, "data": base64_data } }
                ]
            }]
        });

        let response = self.http.post(&url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "Classification service error");
            return Err(ClassifierError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let payload: serde_json::Value = response.json().await?;
        let text = extract_candidate_text(&payload).ok_or(ClassifierError::EmptyResponse)?;

        let result = parse_verification(text)?;
        tracing::debug!(
            waste_type = %result.waste_type,
            confidence = result.confidence,
            "Image classified"
        );
        Ok(result)
    }
}

/// Pull the first candidate's first text part out of a `generateContent`
/// response.
fn extract_candidate_text(payload: &serde_json::Value) -> Option<&str> {
    payload
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .get(0)?
        .get("text")?
        .as_str()
}
