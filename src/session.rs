//! Interaction state for one diagnosis workflow
//!
//! Holds the current image and the outcome of the last analysis. Every
//! transition replaces the state wholesale, so a result and an error are
//! never visible at the same time.

use crate::ai::DiagnosisService;
use crate::models::{DiagnosisResult, EncodedImage};
use crate::{Error, Result};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Loading,
    Success(DiagnosisResult),
    Failure(String),
}

#[derive(Debug, Default)]
pub struct Session {
    image: Option<EncodedImage>,
    state: SessionState,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current image and clears any previous result or error.
    pub fn set_image(&mut self, image: Option<EncodedImage>) {
        if image.is_none() {
            info!("Image cleared. Upload a new image to analyze.");
        }
        self.image = image;
        self.state = SessionState::Idle;
    }

    pub fn image(&self) -> Option<&EncodedImage> {
        self.image.as_ref()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, SessionState::Loading)
    }

    pub fn result(&self) -> Option<&DiagnosisResult> {
        match &self.state {
            SessionState::Success(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            SessionState::Failure(message) => Some(message),
            _ => None,
        }
    }

    /// Runs one diagnosis for the current image.
    ///
    /// Fails with [`Error::NoImage`] without calling `service` when no image
    /// is loaded. Service failures come back as [`Error::Analysis`]. The
    /// `&mut self` receiver keeps a single request in flight.
    pub async fn analyze(&mut self, service: &dyn DiagnosisService) -> Result<DiagnosisResult> {
        let Some(image) = self.image.clone() else {
            let err = Error::NoImage;
            warn!("{}", err);
            self.state = SessionState::Failure(err.to_string());
            return Err(err);
        };

        self.state = SessionState::Loading;
        info!("Analyzing... inspecting the plant image");

        match service.detect_disease(&image).await {
            Ok(result) => {
                info!("Analysis complete");
                self.state = SessionState::Success(result.clone());
                Ok(result)
            }
            Err(e) => {
                warn!("Analysis failed: {}", e);
                let err = Error::Analysis(Box::new(e));
                self.state = SessionState::Failure(err.to_string());
                Err(err)
            }
        }
    }
}
