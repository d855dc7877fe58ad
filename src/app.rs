//! Application orchestration for acquiring images and requesting diagnoses.

use crate::acquisition::{ImageAcquirer, ImageSource};
use crate::ai::{DiagnosisService, GeminiDiagnosisClient, OpenAiDiagnosisClient};
use crate::models::{
    AiConfig, AiProvider, DiagnosisResult, EncodedImage, FetchConfig, TreatmentRecommendation,
};
use crate::session::Session;
use crate::{Error, Result};
use tracing::info;

/// Coordinates image acquisition and the diagnosis model for one invocation.
pub struct App {
    acquirer: ImageAcquirer,
    diagnosis: Option<Box<dyn DiagnosisService>>,
}

/// Injectable service bundle used to construct [`App`] in tests/harnesses.
pub struct AppServices {
    pub acquirer: ImageAcquirer,
    pub diagnosis: Option<Box<dyn DiagnosisService>>,
}

impl App {
    pub fn with_services(services: AppServices) -> Self {
        Self {
            acquirer: services.acquirer,
            diagnosis: services.diagnosis,
        }
    }

    /// Builds the app from configuration. Without `ai`, only image encoding
    /// is available.
    pub fn new(fetch: &FetchConfig, ai: Option<&AiConfig>) -> Self {
        // Reuse one HTTP connection pool for image fetches and the model.
        let http_client = reqwest::Client::new();

        let diagnosis = ai.map(|config| Self::build_diagnosis_service(config, http_client.clone()));

        Self::with_services(AppServices {
            acquirer: ImageAcquirer::new_with_client(fetch, http_client),
            diagnosis,
        })
    }

    pub fn build_diagnosis_service(
        config: &AiConfig,
        http_client: reqwest::Client,
    ) -> Box<dyn DiagnosisService> {
        match config.provider {
            AiProvider::Gemini => {
                info!("Diagnosis provider: Gemini (model: {})", config.model);
                let mut client = GeminiDiagnosisClient::new_with_client(
                    config.api_key.clone(),
                    config.model.clone(),
                    http_client,
                )
                .with_timeout(config.request_timeout);
                if let Some(base_url) = &config.base_url {
                    client = client.with_base_url(base_url.clone());
                }
                Box::new(client)
            }
            AiProvider::OpenAi => {
                info!("Diagnosis provider: OpenAI (model: {})", config.model);
                let mut client = OpenAiDiagnosisClient::new_with_client(
                    config.api_key.clone(),
                    config.model.clone(),
                    http_client,
                )
                .with_timeout(config.request_timeout);
                if let Some(base_url) = &config.base_url {
                    client = client.with_base_url(base_url.clone());
                }
                Box::new(client)
            }
        }
    }

    fn diagnosis_service(&self) -> Result<&dyn DiagnosisService> {
        self.diagnosis
            .as_deref()
            .ok_or_else(|| Error::Config("No diagnosis provider configured".to_string()))
    }

    pub async fn encode(&self, source: &ImageSource) -> Result<EncodedImage> {
        self.acquirer.acquire(source).await
    }

    /// Acquires the image and runs one diagnosis on it.
    pub async fn diagnose(&self, source: &ImageSource) -> Result<DiagnosisResult> {
        let service = self.diagnosis_service()?;
        let image = self.acquirer.acquire(source).await?;

        let mut session = Session::new();
        session.set_image(Some(image));
        session.analyze(service).await
    }

    pub async fn recommend_treatment(&self, disease_name: &str) -> Result<TreatmentRecommendation> {
        let service = self.diagnosis_service()?;
        info!("Requesting treatment recommendations for '{}'", disease_name);
        service.recommend_treatment(disease_name).await
    }
}
