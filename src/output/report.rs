//! Report structure shared by all output formats

use crate::parsing::scores::ScoreBand;
use crate::parsing::ParsedAnalysis;
use crate::session::AnalysisOutcome;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub analysis: ParsedAnalysis,
    pub band: ScoreBand,
    /// Narrative analysis rendered as HTML.
    pub narrative_html: String,
    /// Rewritten resume as returned by the model.
    pub improved_resume: Option<String>,
    pub improved_resume_html: Option<String>,
    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub version: String,
    pub resume_file: Option<String>,
    pub model: Option<String>,
}

impl ReportMetadata {
    pub fn new(resume_file: Option<String>, model: Option<String>) -> Self {
        Self {
            generated_at: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            resume_file,
            model,
        }
    }
}

impl AnalysisReport {
    pub fn from_outcome(outcome: &AnalysisOutcome, metadata: ReportMetadata) -> Self {
        let improved_resume = outcome
            .response
            .has_improved_resume()
            .then(|| outcome.response.improved_resume.clone());

        Self {
            band: outcome.analysis.band(),
            analysis: outcome.analysis.clone(),
            narrative_html: outcome.narrative_markup.clone(),
            improved_resume,
            improved_resume_html: outcome.resume_markup.clone(),
            metadata,
        }
    }

    /// One-line verdict, e.g. "74/100 Good match".
    pub fn verdict(&self) -> String {
        format!("{}/100 {}", self.analysis.overall_score, self.band.label())
    }
}
