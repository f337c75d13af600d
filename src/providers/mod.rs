use std::future::Future;

use crate::core::errors::AppResult;

pub mod gemini;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Text,
    Json,
}

/// A text-completion backend. Production uses [`gemini::GeminiClient`].
pub trait TextModel {
    fn generate(
        &self,
        prompt: &str,
        format: ResponseFormat,
    ) -> impl Future<Output = AppResult<String>> + Send;

    fn model_name(&self) -> &str;
}
