//! Error handling for the ATS matcher
//!
//! Only the plumbing around the parsing core is fallible. Extracting structure
//! from an LLM reply never errors: missing structure degrades to defaults.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AtsMatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("DOCX extraction error: {0}")]
    DocxExtraction(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("LLM provider error: {0}")]
    LlmProvider(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),

    #[error("Session error: {0}")]
    Session(#[from] crate::session::TransitionError),

    #[error("Analysis failed: {0}")]
    AnalysisFailed(String),
}

pub type Result<T> = std::result::Result<T, AtsMatchError>;

/// Convert anyhow errors to our custom error type
impl From<anyhow::Error> for AtsMatchError {
    fn from(err: anyhow::Error) -> Self {
        AtsMatchError::AnalysisFailed(err.to_string())
    }
}

impl From<askama::Error> for AtsMatchError {
    fn from(err: askama::Error) -> Self {
        AtsMatchError::OutputFormatting(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = AtsMatchError::UnsupportedFormat("cv.docx".to_string());
        assert_eq!(err.to_string(), "File format not supported: cv.docx");

        let err: AtsMatchError = anyhow::anyhow!("model refused").into();
        assert!(matches!(err, AtsMatchError::AnalysisFailed(ref msg) if msg == "model refused"));
    }

    #[test]
    fn test_session_errors_convert() {
        let err: AtsMatchError = crate::session::TransitionError::Incomplete.into();
        assert_eq!(err.to_string(), "Session error: Missing resume, job description, or LLM");
    }
}
