use thiserror::Error;

#[derive(Error, Debug)]
pub enum ItineraryError {
    #[error("Malformed CSV structure: {0}")]
    CsvStructure(String),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[cfg(feature = "gemini")]
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    #[cfg(feature = "gemini")]
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ItineraryError>;
