//! Image acquisition
//!
//! Turns a local file or a URL into an [`EncodedImage`] ready to be sent to
//! the diagnosis model.

pub mod file;
pub mod mime;
pub mod remote;

pub use file::{encode_file, ImageFile, MemoryImageFile, PathImageFile};
pub use remote::RemoteImageFetcher;

use crate::models::{EncodedImage, FetchConfig};
use crate::Result;
use std::path::PathBuf;

/// Largest accepted upload: 5 MiB.
pub const MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

/// Where the user's image comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Path {
        path: PathBuf,
        content_type: Option<String>,
    },
    Url(String),
}

pub struct ImageAcquirer {
    remote: RemoteImageFetcher,
}

impl ImageAcquirer {
    pub fn new(config: &FetchConfig) -> Self {
        Self::new_with_client(config, reqwest::Client::new())
    }

    pub fn new_with_client(config: &FetchConfig, client: reqwest::Client) -> Self {
        Self {
            remote: RemoteImageFetcher::new_with_client(config, client),
        }
    }

    pub async fn from_file(&self, file: &dyn ImageFile) -> Result<EncodedImage> {
        encode_file(file).await
    }

    pub async fn from_url(&self, url: &str) -> Result<EncodedImage> {
        self.remote.fetch(url).await
    }

    pub async fn acquire(&self, source: &ImageSource) -> Result<EncodedImage> {
        match source {
            ImageSource::Path { path, content_type } => {
                let mut file = PathImageFile::open(path).await?;
                if let Some(content_type) = content_type {
                    file = file.with_content_type(content_type.clone());
                }
                let encoded = self.from_file(&file).await?;
                tracing::info!("Loaded image from {}", path.display());
                Ok(encoded)
            }
            ImageSource::Url(url) => self.from_url(url).await,
        }
    }
}
