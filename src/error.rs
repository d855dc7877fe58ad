//! Error handling and custom error types
//!
//! Every failure the tool can hit is represented here as a variant whose
//! `Display` output is the message shown to the user.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("File is too large. Maximum 5MB allowed.")]
    SizeLimit { size: u64, limit: u64 },

    #[error("Invalid file type. Please upload an image.")]
    InvalidType(String),

    #[error("Please enter an image URL.")]
    MissingUrl,

    #[error("Could not load image from URL. Failed to fetch image: {status} {reason}")]
    Fetch { status: u16, reason: String },

    #[error(
        "Could not load image from URL. URL does not point to a valid image. \
         Ensure the URL directly links to an image file."
    )]
    ContentType(Option<String>),

    #[error("Invalid URL or network issue. Please check the URL and your connection. ({0})")]
    Network(String),

    #[error("{0}")]
    RemoteService(String),

    #[error("Failed to analyze plant. {0}")]
    Analysis(#[source] Box<Error>),

    #[error("Please upload or load an image first.")]
    NoImage,

    #[error("Invalid encoded image: {0}")]
    InvalidEncodedImage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
