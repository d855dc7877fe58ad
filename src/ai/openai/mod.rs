pub mod client;
pub mod diagnosis;
pub mod types;

pub use diagnosis::OpenAiDiagnosisClient;
