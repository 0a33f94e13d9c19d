//! Splitting one combined reply into the analysis and the rewritten resume

use crate::parsing::grammar::{Phrase, IMPROVED_RESUME_LABEL};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static CREATE_IMPROVED: LazyLock<Phrase> = LazyLock::new(|| Phrase::new("Create an Improved Resume"));

/// The two texts carried by one reply to the ATS prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmResponse {
    pub analysis: String,
    /// Empty when the model produced no rewrite.
    pub improved_resume: String,
}

impl LlmResponse {
    pub fn has_improved_resume(&self) -> bool {
        !self.improved_resume.trim().is_empty()
    }
}

/// Split at the "Create an Improved Resume" step heading, or failing that at
/// an `Improved Resume:` label line. Without either, everything is analysis.
pub fn split_response(raw: &str) -> LlmResponse {
    let text = raw.replace("\r\n", "\n");

    if let Some((start, end)) = CREATE_IMPROVED.find(&text) {
        let line_start = text[..start].rfind('\n').map(|i| i + 1).unwrap_or(0);
        let line_end = text[end..].find('\n').map(|i| end + i + 1).unwrap_or(text.len());
        debug!("Improved resume starts after byte {}", line_end);
        return LlmResponse {
            analysis: text[..line_start].trim_end().to_string(),
            improved_resume: text[line_end..].trim().to_string(),
        };
    }

    if let Some(m) = IMPROVED_RESUME_LABEL.find(&text) {
        return LlmResponse {
            analysis: text[..m.start()].trim_end().to_string(),
            improved_resume: text[m.end()..].trim().to_string(),
        };
    }

    warn!("Reply carries no improved resume");
    LlmResponse {
        analysis: text.trim().to_string(),
        improved_resume: String::new(),
    }
}
