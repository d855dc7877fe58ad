use super::DiagnosisService;
use crate::models::{DiagnosisResult, EncodedImage, TreatmentRecommendation};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// In-process stand-in for the remote model.
///
/// Queued responses are returned in order and cycle once exhausted.
#[derive(Clone)]
pub struct MockDiagnosisClient {
    diagnosis_responses: Arc<Mutex<Vec<DiagnosisResult>>>,
    treatment_responses: Arc<Mutex<Vec<String>>>,
    failure: Option<String>,
    call_count: Arc<Mutex<usize>>,
    last_image: Arc<Mutex<Option<EncodedImage>>>,
}

impl MockDiagnosisClient {
    pub fn new() -> Self {
        Self {
            diagnosis_responses: Arc::new(Mutex::new(Vec::new())),
            treatment_responses: Arc::new(Mutex::new(Vec::new())),
            failure: None,
            call_count: Arc::new(Mutex::new(0)),
            last_image: Arc::new(Mutex::new(None)),
        }
    }

    pub fn with_diagnosis_response(self, diagnosis: &str, treatment: &str) -> Self {
        self.diagnosis_responses.lock().unwrap().push(DiagnosisResult {
            diagnosis: diagnosis.to_string(),
            treatment: treatment.to_string(),
        });
        self
    }

    pub fn with_treatment_response(self, response: String) -> Self {
        self.treatment_responses.lock().unwrap().push(response);
        self
    }

    /// Every call fails with `RemoteService(message)`.
    pub fn with_failure(mut self, message: String) -> Self {
        self.failure = Some(message);
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn last_image(&self) -> Option<EncodedImage> {
        self.last_image.lock().unwrap().clone()
    }

    fn record_call(&self) -> Result<usize> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;
        match &self.failure {
            Some(message) => Err(Error::RemoteService(message.clone())),
            None => Ok(*count),
        }
    }
}

impl Default for MockDiagnosisClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DiagnosisService for MockDiagnosisClient {
    async fn detect_disease(&self, image: &EncodedImage) -> Result<DiagnosisResult> {
        *self.last_image.lock().unwrap() = Some(image.clone());
        let count = self.record_call()?;

        let responses = self.diagnosis_responses.lock().unwrap();
        if responses.is_empty() {
            Ok(DiagnosisResult {
                diagnosis: "No disease detected".to_string(),
                treatment: "No treatment needed".to_string(),
            })
        } else {
            Ok(responses[(count - 1) % responses.len()].clone())
        }
    }

    async fn recommend_treatment(&self, disease_name: &str) -> Result<TreatmentRecommendation> {
        let count = self.record_call()?;

        let responses = self.treatment_responses.lock().unwrap();
        let treatment_recommendations = if responses.is_empty() {
            format!("Isolate the plant and consult a specialist about {}", disease_name)
        } else {
            responses[(count - 1) % responses.len()].clone()
        };

        Ok(TreatmentRecommendation {
            treatment_recommendations,
        })
    }
}
