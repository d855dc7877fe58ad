use super::mime;
use crate::models::{EncodedImage, FetchConfig, DATA_URI_IMAGE_PREFIX};
use crate::{Error, Result};
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Url};
use std::time::Duration;

/// Downloads images from URLs and encodes them as data URIs.
pub struct RemoteImageFetcher {
    client: Client,
    user_agent: String,
    timeout: Option<Duration>,
}

impl RemoteImageFetcher {
    pub fn new(config: &FetchConfig) -> Self {
        Self::new_with_client(config, Client::new())
    }

    pub fn new_with_client(config: &FetchConfig, client: Client) -> Self {
        Self {
            client,
            user_agent: config.user_agent.clone(),
            timeout: config.request_timeout,
        }
    }

    /// Fetches `url` and returns it as an [`EncodedImage`].
    ///
    /// Strings that already start with `data:image` are returned verbatim
    /// without touching the network.
    pub async fn fetch(&self, url: &str) -> Result<EncodedImage> {
        let url = url.trim();
        if url.is_empty() {
            return Err(Error::MissingUrl);
        }

        if url.starts_with(DATA_URI_IMAGE_PREFIX) {
            tracing::debug!("Input is already a data URI, skipping fetch");
            return Ok(EncodedImage::from_raw(url));
        }

        let parsed = Url::parse(url).map_err(|e| {
            tracing::error!("Invalid image URL '{}': {}", url, e);
            Error::Network(format!("invalid URL '{}': {}", url, e))
        })?;

        tracing::debug!("Fetching image from {}", parsed);

        let mut request = self
            .client
            .get(parsed)
            .header(USER_AGENT, self.user_agent.as_str());
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!("Failed to fetch image from {}: {}", url, e);
            Error::Network(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("Image fetch from {} failed with status {}", url, status);
            return Err(Error::Fetch {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let content_type = match content_type {
            Some(ct) if mime::is_image_type(&ct) => ct,
            other => {
                tracing::error!("URL {} returned non-image content type {:?}", url, other);
                return Err(Error::ContentType(other));
            }
        };

        let body = response.bytes().await.map_err(|e| {
            tracing::error!("Failed to read image body from {}: {}", url, e);
            Error::Network(e.to_string())
        })?;

        tracing::info!(
            "Loaded {} byte {} image from URL",
            body.len(),
            mime::media_type(&content_type)
        );

        Ok(EncodedImage::encode(mime::media_type(&content_type), &body))
    }
}
