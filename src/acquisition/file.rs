use super::{mime, MAX_FILE_SIZE};
use crate::models::EncodedImage;
use crate::{Error, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// A user-selected file whose size and declared type are known before its
/// content is read.
#[async_trait]
pub trait ImageFile: Send + Sync {
    fn size(&self) -> u64;
    fn content_type(&self) -> &str;
    async fn read_all(&self) -> Result<Vec<u8>>;
}

/// A file on disk. The declared type comes from the extension unless
/// overridden with [`PathImageFile::with_content_type`].
#[derive(Debug, Clone)]
pub struct PathImageFile {
    path: PathBuf,
    size: u64,
    content_type: String,
}

impl PathImageFile {
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path).await?;
        if !metadata.is_file() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} is not a file", path.display()),
            )));
        }

        Ok(Self {
            path: path.to_path_buf(),
            size: metadata.len(),
            content_type: mime::declared_type_for_path(path).to_string(),
        })
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ImageFile for PathImageFile {
    fn size(&self) -> u64 {
        self.size
    }

    fn content_type(&self) -> &str {
        &self.content_type
    }

    async fn read_all(&self) -> Result<Vec<u8>> {
        Ok(tokio::fs::read(&self.path).await?)
    }
}

/// An in-memory file, e.g. an upload already received by an embedding caller.
#[derive(Debug, Clone)]
pub struct MemoryImageFile {
    data: Vec<u8>,
    content_type: String,
}

impl MemoryImageFile {
    pub fn new(data: Vec<u8>, content_type: impl Into<String>) -> Self {
        Self {
            data,
            content_type: content_type.into(),
        }
    }
}

#[async_trait]
impl ImageFile for MemoryImageFile {
    fn size(&self) -> u64 {
        self.data.len() as u64
    }

    fn content_type(&self) -> &str {
        &self.content_type
    }

    async fn read_all(&self) -> Result<Vec<u8>> {
        Ok(self.data.clone())
    }
}

/// Validates `file` and encodes it as a data URI.
///
/// Size is checked before type, and neither rejection reads the content.
pub async fn encode_file(file: &dyn ImageFile) -> Result<EncodedImage> {
    let size = file.size();
    if size > MAX_FILE_SIZE {
        tracing::warn!("Rejected file of {} bytes (limit {})", size, MAX_FILE_SIZE);
        return Err(Error::SizeLimit {
            size,
            limit: MAX_FILE_SIZE,
        });
    }

    let content_type = file.content_type();
    if !mime::is_image_type(content_type) {
        tracing::warn!("Rejected file with declared type '{}'", content_type);
        return Err(Error::InvalidType(content_type.to_string()));
    }

    let bytes = file.read_all().await?;
    // The file may have grown since its size was taken.
    if bytes.len() as u64 > MAX_FILE_SIZE {
        return Err(Error::SizeLimit {
            size: bytes.len() as u64,
            limit: MAX_FILE_SIZE,
        });
    }

    tracing::debug!("Encoding {} byte {} file", bytes.len(), content_type);
    Ok(EncodedImage::encode(content_type, &bytes))
}
