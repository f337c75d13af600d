use std::collections::HashMap;
use std::time::Duration;

use axum::http::StatusCode;
use proofreader_lib::core::config::{AppConfig, DEFAULT_MODEL};
use proofreader_lib::core::errors::AppError;
use proofreader_lib::providers::gemini::{candidate_text, GeminiClient};
use proofreader_lib::providers::TextModel;
use serde_json::json;

fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, AppError> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    AppConfig::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn config_defaults_apply_when_only_the_key_is_set() {
    let config = config_from(&[("GOOGLE_API_KEY", "secret")]).expect("config");
    assert_eq!(config.api_key, "secret");
    assert_eq!(config.model, DEFAULT_MODEL);
    assert_eq!(config.bind_addr.to_string(), "127.0.0.1:5000");
    assert_eq!(config.request_timeout, Duration::from_secs(120));
    assert_eq!(config.max_upload_bytes, 25 * 1024 * 1024);
    assert!(config.glossary.is_empty());
}

#[test]
fn config_reads_overrides_and_glossary() {
    let config = config_from(&[
        ("GOOGLE_API_KEY", "secret"),
        ("PROOFREAD_MODEL", "gemini-2.5-flash"),
        ("PROOFREAD_BIND", "0.0.0.0:8080"),
        ("PROOFREAD_TIMEOUT_SECS", "30"),
        ("PROOFREAD_MAX_UPLOAD_MB", "5"),
        ("PROOFREAD_GLOSSARY", "OJK, Bank Mandiri,, SOP "),
    ])
    .expect("config");
    assert_eq!(config.model, "gemini-2.5-flash");
    assert_eq!(config.bind_addr.port(), 8080);
    assert_eq!(config.request_timeout, Duration::from_secs(30));
    assert_eq!(config.max_upload_bytes, 5 * 1024 * 1024);
    assert_eq!(config.glossary, vec!["OJK", "Bank Mandiri", "SOP"]);
}

#[test]
fn config_requires_an_api_key() {
    let err = config_from(&[("GOOGLE_API_KEY", "   ")]).expect_err("blank key");
    assert!(matches!(err, AppError::Configuration(_)));
    assert!(config_from(&[]).is_err());
}

#[test]
fn config_rejects_malformed_numbers_and_addresses() {
    assert!(matches!(
        config_from(&[("GOOGLE_API_KEY", "k"), ("PROOFREAD_TIMEOUT_SECS", "soon")]),
        Err(AppError::Configuration(_))
    ));
    assert!(matches!(
        config_from(&[("GOOGLE_API_KEY", "k"), ("PROOFREAD_BIND", "localhost")]),
        Err(AppError::Configuration(_))
    ));
}

#[test]
fn client_errors_map_to_bad_request() {
    for err in [
        AppError::InvalidInput("x".to_string()),
        AppError::UnsupportedFormat("x".to_string()),
        AppError::NothingToExport("x".to_string()),
    ] {
        assert_eq!(err.status(), StatusCode::BAD_REQUEST, "{}", err.code());
    }
    for err in [
        AppError::ProviderAuth,
        AppError::ProviderTimeout,
        AppError::Document("x".to_string()),
        AppError::Internal("x".to_string()),
    ] {
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR, "{}", err.code());
    }
}

#[test]
fn error_body_carries_code_and_message() {
    let value = serde_json::to_value(AppError::NothingToExport("empty".to_string())).expect("json");
    assert_eq!(value["code"], "NOTHING_TO_EXPORT");
    assert_eq!(value["error"], "nothing to export: empty");
}

#[test]
fn gemini_client_needs_a_key_and_reports_its_model() {
    assert!(GeminiClient::new("gemini-2.5-pro", " ", Duration::from_secs(1)).is_err());
    let client = GeminiClient::new("gemini-2.5-pro", "key", Duration::from_secs(1)).expect("client");
    assert_eq!(client.model_name(), "gemini-2.5-pro");
}

#[test]
fn candidate_text_joins_parts_of_first_candidate() {
    let body = json!({
        "candidates": [
            {"content": {"parts": [{"text": "[WRONG] a "}, {"text": "-> [CORRECT] b"}]}},
            {"content": {"parts": [{"text": "ignored"}]}}
        ]
    });
    assert_eq!(candidate_text(&body).expect("text"), "[WRONG] a -> [CORRECT] b");

    let blocked = json!({"promptFeedback": {"blockReason": "SAFETY"}});
    assert!(matches!(
        candidate_text(&blocked),
        Err(AppError::ProviderInvalidResponse(_))
    ));
}
