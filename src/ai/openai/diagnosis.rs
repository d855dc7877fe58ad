use super::client::OpenAiHttpClient;
use super::types::{
    ChatCompletionRequest, ChatMessage, ChatMessageContent, MessagePart, ResponseFormat,
};
use crate::ai::{parse_output, DiagnosisService};
use crate::models::{DiagnosisResult, EncodedImage, TreatmentRecommendation};
use crate::{prompts, Error, Result};
use async_trait::async_trait;
use std::time::Duration;

pub struct OpenAiDiagnosisClient {
    http: OpenAiHttpClient,
    model: String,
}

impl OpenAiDiagnosisClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_client(api_key, model, reqwest::Client::new())
    }

    pub fn new_with_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            http: OpenAiHttpClient::new_with_client(api_key, client),
            model,
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

    async fn complete(
        &self,
        content: ChatMessageContent,
        response_format: ResponseFormat,
    ) -> Result<String> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: Some(content),
            }],
            response_format: Some(response_format),
        };

        let response = self.http.chat_completion(&request).await?;

        response
            .first_text()
            .map(str::to_string)
            .ok_or_else(|| Error::RemoteService("No output from OpenAI".to_string()))
    }
}

#[async_trait]
impl DiagnosisService for OpenAiDiagnosisClient {
    async fn detect_disease(&self, image: &EncodedImage) -> Result<DiagnosisResult> {
        tracing::debug!(
            "Requesting diagnosis from OpenAI model {} ({:?})",
            self.model,
            image
        );

        let schema = serde_json::json!({
            "type": "object",
            "properties": {
                "diagnosis": {
                    "type": "string",
                    "description": "The diagnosis of the plant disease."
                },
                "treatment": {
                    "type": "string",
                    "description": "The recommended treatment for the plant disease."
                }
            },
            "required": ["diagnosis", "treatment"],
            "additionalProperties": false
        });

        let content = ChatMessageContent::Parts(vec![
            MessagePart::text(prompts::DIAGNOSE.to_string()),
            MessagePart::image_url(image.as_str().to_string()),
        ]);

        let text = self
            .complete(
                content,
                ResponseFormat::strict_schema("plant_diagnosis", schema),
            )
            .await?;
        parse_output(&text, "OpenAI")
    }

    async fn recommend_treatment(&self, disease_name: &str) -> Result<TreatmentRecommendation> {
        tracing::debug!("Requesting treatment for '{}' from OpenAI", disease_name);

        let schema = serde_json::json!({
            "type": "object",
            "properties": {
                "treatmentRecommendations": {
                    "type": "string",
                    "description": "Detailed advice on how to handle the plant's infection."
                }
            },
            "required": ["treatmentRecommendations"],
            "additionalProperties": false
        });

        let content = ChatMessageContent::Text(prompts::render(
            prompts::TREATMENT,
            &[("disease_name", disease_name)],
        ));

        let text = self
            .complete(
                content,
                ResponseFormat::strict_schema("treatment_recommendation", schema),
            )
            .await?;
        parse_output(&text, "OpenAI")
    }
}
