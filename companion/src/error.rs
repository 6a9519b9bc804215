use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompanionError {
    #[error("Please upload a PDF and enter your question before generating a response.")]
    MissingInput,

    #[error("upload is larger than the {limit}-byte limit")]
    UploadTooLarge { limit: usize },

    #[error("invalid upload: {0}")]
    InvalidUpload(String),

    #[error("failed to extract text from PDF: {0}")]
    Extraction(String),

    #[error("failed to split document text: {0}")]
    Splitting(String),

    #[error("model request failed: {0}")]
    RemoteService(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl CompanionError {
    /// Stable label used by the JSON surface and in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            CompanionError::MissingInput => "missing_input",
            CompanionError::UploadTooLarge { .. } => "payload_too_large",
            CompanionError::InvalidUpload(_) => "bad_request",
            CompanionError::Extraction(_) => "extraction",
            CompanionError::Splitting(_) => "splitting",
            CompanionError::RemoteService(_) => "remote_service",
            CompanionError::Io(_) => "io",
            CompanionError::Config(_) => "config",
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, CompanionError::RemoteService(_))
    }
}

impl From<reqwest::Error> for CompanionError {
    fn from(error: reqwest::Error) -> Self {
        CompanionError::RemoteService(error.to_string())
    }
}

pub type Result<T, E = CompanionError> = std::result::Result<T, E>;
