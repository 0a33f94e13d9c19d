//! Validated inputs for one match run

use crate::error::{AtsMatchError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRequest {
    pub resume_path: PathBuf,
    pub job_description: String,
    pub model: String,
}

impl MatchRequest {
    pub fn new(resume_path: impl Into<PathBuf>, job_description: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            resume_path: resume_path.into(),
            job_description: job_description.into(),
            model: model.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let missing = self.resume_path.as_os_str().is_empty()
            || self.job_description.trim().is_empty()
            || self.model.trim().is_empty();
        if missing {
            return Err(AtsMatchError::InvalidInput(
                "Missing resume, job description, or LLM".to_string(),
            ));
        }
        Ok(())
    }
}
