//! Data models and structures
//!
//! Defines the encoded image representation, diagnosis payloads, and the
//! environment-driven configuration.

use crate::{Error, Result};
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Prefix that marks a string as an already-encoded image.
pub const DATA_URI_IMAGE_PREFIX: &str = "data:image";

/// A self-describing `data:<mime>;base64,<payload>` string.
///
/// Values built with [`EncodedImage::encode`] are always well-formed. Values
/// built with [`EncodedImage::from_raw`] are carried verbatim; the accessors
/// return `None` when the string does not follow the data URI layout.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncodedImage(String);

impl EncodedImage {
    pub fn encode(mime_type: &str, bytes: &[u8]) -> Self {
        let payload = base64::engine::general_purpose::STANDARD.encode(bytes);
        Self(format!("data:{};base64,{}", mime_type, payload))
    }

    pub fn from_raw(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    fn parts(&self) -> Option<(&str, &str)> {
        let rest = self.0.strip_prefix("data:")?;
        let (header, payload) = rest.split_once(',')?;
        let mime = header.strip_suffix(";base64")?;
        Some((mime, payload))
    }

    /// MIME segment of the data URI.
    pub fn mime_type(&self) -> Option<&str> {
        self.parts().map(|(mime, _)| mime)
    }

    /// Base64 segment of the data URI.
    pub fn payload(&self) -> Option<&str> {
        self.parts().map(|(_, payload)| payload)
    }

    pub fn decode(&self) -> Result<Vec<u8>> {
        let payload = self
            .payload()
            .ok_or_else(|| Error::InvalidEncodedImage("not a base64 data URI".to_string()))?;
        base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| Error::InvalidEncodedImage(e.to_string()))
    }
}

impl fmt::Display for EncodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Payloads run to megabytes; keep them out of debug logs.
impl fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodedImage")
            .field("mime_type", &self.mime_type())
            .field("len", &self.0.len())
            .finish()
    }
}

/// Diagnosis and treatment text returned by the remote model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisResult {
    pub diagnosis: String,
    pub treatment: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreatmentRecommendation {
    pub treatment_recommendations: String,
}

// Configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiProvider {
    Gemini,
    OpenAi,
}

impl AiProvider {
    pub fn default_model(self) -> &'static str {
        match self {
            AiProvider::Gemini => "gemini-2.0-flash",
            AiProvider::OpenAi => "gpt-4o-mini",
        }
    }

    fn api_key_var(self) -> &'static str {
        match self {
            AiProvider::Gemini => "GEMINI_API_KEY",
            AiProvider::OpenAi => "OPENAI_API_KEY",
        }
    }
}

impl FromStr for AiProvider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" | "googleai" => Ok(AiProvider::Gemini),
            "openai" => Ok(AiProvider::OpenAi),
            other => Err(Error::Config(format!(
                "Unknown AI_PROVIDER '{}'. Expected 'gemini' or 'openai'",
                other
            ))),
        }
    }
}

pub const DEFAULT_USER_AGENT: &str = "LeafGuardAI/1.0";

/// Settings for fetching images from URLs.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub request_timeout: Option<Duration>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: None,
        }
    }
}

impl FetchConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let user_agent =
            lookup("IMAGE_FETCH_USER_AGENT").unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());
        if reqwest::header::HeaderValue::from_str(&user_agent).is_err() {
            return Err(Error::Config(format!(
                "Invalid IMAGE_FETCH_USER_AGENT '{}'. Expected a valid header value",
                user_agent.escape_debug()
            )));
        }

        Ok(Self {
            user_agent,
            request_timeout: parse_timeout(lookup("REQUEST_TIMEOUT_SECS"))?,
        })
    }
}

/// Settings for the remote diagnosis model.
#[derive(Debug, Clone)]
pub struct AiConfig {
    pub provider: AiProvider,
    pub api_key: String,
    pub model: String,
    pub base_url: Option<String>,
    pub request_timeout: Option<Duration>,
}

impl AiConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let provider = match lookup("AI_PROVIDER") {
            Some(value) => value.parse()?,
            None => AiProvider::Gemini,
        };

        let key_var = provider.api_key_var();
        let api_key = lookup(key_var)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::Config(format!("{} not set", key_var)))?;

        Ok(Self {
            provider,
            api_key,
            model: lookup("AI_MODEL").unwrap_or_else(|| provider.default_model().to_string()),
            base_url: lookup("AI_BASE_URL"),
            request_timeout: parse_timeout(lookup("REQUEST_TIMEOUT_SECS"))?,
        })
    }
}

fn parse_timeout(value: Option<String>) -> Result<Option<Duration>> {
    match value {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(|secs| Some(Duration::from_secs(secs)))
            .map_err(|_| {
                Error::Config(format!(
                    "Invalid REQUEST_TIMEOUT_SECS '{}'. Expected whole seconds",
                    raw
                ))
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_encode_produces_data_uri() {
        let image = EncodedImage::encode("image/png", b"hello");
        assert_eq!(image.as_str(), "data:image/png;base64,aGVsbG8=");
        assert_eq!(image.mime_type(), Some("image/png"));
        assert_eq!(image.payload(), Some("aGVsbG8="));
    }

    #[test]
    fn test_decode_reproduces_bytes() {
        let bytes: Vec<u8> = (0u8..=255).collect();
        let image = EncodedImage::encode("image/jpeg", &bytes);
        assert_eq!(image.decode().unwrap(), bytes);
    }

    #[test]
    fn test_raw_value_without_layout_has_no_parts() {
        let image = EncodedImage::from_raw("data:image-not-really");
        assert_eq!(image.mime_type(), None);
        assert!(matches!(image.decode(), Err(Error::InvalidEncodedImage(_))));
        assert_eq!(image.as_str(), "data:image-not-really");
    }

    #[test]
    fn test_debug_omits_payload() {
        let image = EncodedImage::encode("image/png", &[0u8; 64]);
        let debug = format!("{:?}", image);
        assert!(debug.contains("image/png"));
        assert!(!debug.contains("AAAA"));
    }

    #[test]
    fn test_treatment_recommendation_wire_name() {
        let json = r#"{"treatmentRecommendations":"Prune infected leaves"}"#;
        let parsed: TreatmentRecommendation = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.treatment_recommendations, "Prune infected leaves");
        assert_eq!(serde_json::to_string(&parsed).unwrap(), json);
    }

    #[test]
    fn test_ai_config_defaults_to_gemini() {
        let config = AiConfig::from_lookup(lookup_from(&[("GEMINI_API_KEY", "g-key")])).unwrap();
        assert_eq!(config.provider, AiProvider::Gemini);
        assert_eq!(config.api_key, "g-key");
        assert_eq!(config.model, "gemini-2.0-flash");
        assert!(config.request_timeout.is_none());
    }

    #[test]
    fn test_ai_config_requires_provider_key() {
        let err = AiConfig::from_lookup(lookup_from(&[
            ("AI_PROVIDER", "openai"),
            ("GEMINI_API_KEY", "g-key"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_ai_config_rejects_unknown_provider() {
        let err = AiConfig::from_lookup(lookup_from(&[("AI_PROVIDER", "bard")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_fetch_config_reads_overrides() {
        let config = FetchConfig::from_lookup(lookup_from(&[
            ("IMAGE_FETCH_USER_AGENT", "Custom/2.0"),
            ("REQUEST_TIMEOUT_SECS", "15"),
        ]))
        .unwrap();
        assert_eq!(config.user_agent, "Custom/2.0");
        assert_eq!(config.request_timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_fetch_config_rejects_invalid_user_agent() {
        let err =
            FetchConfig::from_lookup(lookup_from(&[("IMAGE_FETCH_USER_AGENT", "Leaf\nGuard")]))
                .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("IMAGE_FETCH_USER_AGENT"));
    }

    #[test]
    fn test_fetch_config_rejects_bad_timeout() {
        let err =
            FetchConfig::from_lookup(lookup_from(&[("REQUEST_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert!(err.to_string().contains("REQUEST_TIMEOUT_SECS"));
    }
}
