//! LeafGuard - plant disease diagnosis from a photo
//!
//! Loads a plant image from a local file or a URL, encodes it as a data URI,
//! and asks a hosted generative model for a diagnosis and treatment advice.

pub mod acquisition;
pub mod ai;
pub mod app;
pub mod error;
pub mod models;
pub mod prompts;
pub mod session;

pub use error::{Error, Result};
