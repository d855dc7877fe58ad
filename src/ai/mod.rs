//! Remote model integration for plant diagnosis
//!
//! The model is treated as a one-shot function: a fixed instruction plus one
//! image (or one disease name) in, a small JSON object out. Gemini and OpenAI
//! are supported behind [`DiagnosisService`].

pub mod gemini;
pub mod mock;
pub mod openai;

pub use gemini::GeminiDiagnosisClient;
pub use mock::MockDiagnosisClient;
pub use openai::OpenAiDiagnosisClient;

use crate::models::{DiagnosisResult, EncodedImage, TreatmentRecommendation};
use crate::{Error, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;

#[async_trait]
pub trait DiagnosisService: Send + Sync {
    /// Diagnoses the plant in `image`. The image is forwarded unvalidated.
    async fn detect_disease(&self, image: &EncodedImage) -> Result<DiagnosisResult>;

    async fn recommend_treatment(&self, disease_name: &str) -> Result<TreatmentRecommendation>;
}

/// Parses the model's structured text output into `T`.
///
/// Tolerates a surrounding Markdown code fence.
pub(crate) fn parse_output<T: DeserializeOwned>(text: &str, provider: &str) -> Result<T> {
    let json = strip_code_fence(text);
    serde_json::from_str(json).map_err(|e| {
        tracing::error!("Malformed {} output: {}\nText: {}", provider, e, text);
        Error::RemoteService(format!("Malformed {} output: {}", provider, e))
    })
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
