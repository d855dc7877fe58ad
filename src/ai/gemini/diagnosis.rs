use super::client::GeminiHttpClient;
use super::types::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, InlineData, Part,
};
use crate::ai::{parse_output, DiagnosisService};
use crate::models::{DiagnosisResult, EncodedImage, TreatmentRecommendation};
use crate::{prompts, Error, Result};
use async_trait::async_trait;
use std::time::Duration;

const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

pub struct GeminiDiagnosisClient {
    http: GeminiHttpClient,
}

impl GeminiDiagnosisClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_client(api_key, model, reqwest::Client::new())
    }

    pub fn new_with_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(api_key, model, client),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.http = self.http.with_timeout(timeout);
        self
    }

    fn diagnosis_schema() -> serde_json::Value {
        serde_json::json!({
            "type": "OBJECT",
            "properties": {
                "diagnosis": {
                    "type": "STRING",
                    "description": "The diagnosis of the plant disease."
                },
                "treatment": {
                    "type": "STRING",
                    "description": "The recommended treatment for the plant disease."
                }
            },
            "required": ["diagnosis", "treatment"]
        })
    }

    fn treatment_schema() -> serde_json::Value {
        serde_json::json!({
            "type": "OBJECT",
            "properties": {
                "treatmentRecommendations": {
                    "type": "STRING",
                    "description": "Detailed advice on how to handle the plant's infection."
                }
            },
            "required": ["treatmentRecommendations"]
        })
    }

    fn image_part(image: &EncodedImage) -> Part {
        // Malformed values go out as-is; the API reports what is wrong with them.
        Part::InlineData {
            inline_data: InlineData {
                mime_type: image.mime_type().unwrap_or(FALLBACK_MIME_TYPE).to_string(),
                data: image.payload().unwrap_or(image.as_str()).to_string(),
            },
        }
    }

    async fn generate(&self, parts: Vec<Part>, schema: serde_json::Value) -> Result<String> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts,
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: schema,
            },
        };

        let response: GenerateContentResponse = self.http.generate_content(&request).await?;

        if let Some(text) = response.first_text() {
            return Ok(text.to_string());
        }

        let reason = response
            .candidates
            .first()
            .and_then(|c| c.finish_reason.clone())
            .unwrap_or_else(|| "no candidates".to_string());
        Err(Error::RemoteService(format!(
            "No output from Gemini ({})",
            reason
        )))
    }
}

#[async_trait]
impl DiagnosisService for GeminiDiagnosisClient {
    async fn detect_disease(&self, image: &EncodedImage) -> Result<DiagnosisResult> {
        tracing::debug!(
            "Requesting diagnosis from Gemini model {} ({:?})",
            self.http.model(),
            image
        );

        let parts = vec![
            Part::Text {
                text: prompts::DIAGNOSE.to_string(),
            },
            Self::image_part(image),
        ];

        let text = self.generate(parts, Self::diagnosis_schema()).await?;
        parse_output(&text, "Gemini")
    }

    async fn recommend_treatment(&self, disease_name: &str) -> Result<TreatmentRecommendation> {
        tracing::debug!("Requesting treatment for '{}' from Gemini", disease_name);

        let parts = vec![Part::Text {
            text: prompts::render(prompts::TREATMENT, &[("disease_name", disease_name)]),
        }];

        let text = self.generate(parts, Self::treatment_schema()).await?;
        parse_output(&text, "Gemini")
    }
}
