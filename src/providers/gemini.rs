use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;

use crate::core::errors::{AppError, AppResult};
use crate::providers::{ResponseFormat, TextModel};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(model: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(AppError::Configuration("api key cannot be empty".to_string()));
        }
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| AppError::Network(err.to_string()))?;
        Ok(Self {
            http,
            model: model.into(),
            api_key,
        })
    }

    pub async fn generate_text(&self, prompt: &str, format: ResponseFormat) -> AppResult<String> {
        let endpoint = format!(
            "{API_BASE}/{}:generateContent?key={}",
            self.model, self.api_key
        );
        let mut generation_config = serde_json::json!({ "temperature": 0.2 });
        if format == ResponseFormat::Json {
            generation_config["responseMimeType"] = Value::from("application/json");
        }
        let payload = serde_json::json!({
            "contents": [
                {
                    "role": "user",
                    "parts": [{"text": prompt}]
                }
            ],
            "generationConfig": generation_config
        });

        let started = std::time::Instant::now();
        let response = self
            .http
            .post(endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    AppError::ProviderTimeout
                } else {
                    AppError::Network(err.without_url().to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(status_error(status, &detail));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|err| AppError::ProviderInvalidResponse(err.without_url().to_string()))?;
        let text = candidate_text(&body)?;

        let (prompt_tokens, output_tokens) = token_usage(&body);
        tracing::debug!(
            model = %self.model,
            latency_ms = started.elapsed().as_millis() as u64,
            prompt_tokens,
            output_tokens,
            "model call completed"
        );

        Ok(text)
    }
}

impl TextModel for GeminiClient {
    async fn generate(&self, prompt: &str, format: ResponseFormat) -> AppResult<String> {
        self.generate_text(prompt, format).await
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Concatenated text parts of the first candidate.
pub fn candidate_text(body: &Value) -> AppResult<String> {
    let Some(parts) = body
        .pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)
    else {
        let reason = body
            .pointer("/promptFeedback/blockReason")
            .and_then(Value::as_str)
            .unwrap_or("no candidates returned");
        return Err(AppError::ProviderInvalidResponse(format!(
            "model returned no text: {reason}"
        )));
    };

    let text: String = parts
        .iter()
        .filter_map(|part| part.pointer("/text").and_then(Value::as_str))
        .collect();
    if text.trim().is_empty() {
        return Err(AppError::ProviderInvalidResponse(
            "model returned an empty candidate".to_string(),
        ));
    }
    Ok(text)
}

/// Prompt and output token counts from `usageMetadata`, zero when absent.
fn token_usage(body: &Value) -> (u64, u64) {
    let count = |path: &str| body.pointer(path).and_then(Value::as_u64).unwrap_or(0);
    (
        count("/usageMetadata/promptTokenCount"),
        count("/usageMetadata/candidatesTokenCount"),
    )
}

fn status_error(status: StatusCode, detail: &str) -> AppError {
    const DETAIL_LIMIT: usize = 300;
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AppError::ProviderAuth,
        StatusCode::TOO_MANY_REQUESTS => AppError::ProviderRateLimited,
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => AppError::ProviderTimeout,
        _ => {
            let detail: String = detail.trim().chars().take(DETAIL_LIMIT).collect();
            AppError::ProviderInvalidResponse(format!("model API answered {status}: {detail}"))
        }
    }
}
