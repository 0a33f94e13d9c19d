//! Lifecycle of one resume/job analysis
//!
//! The session moves through `Idle -> Ready -> Analyzing -> Complete | Failed`.
//! Inputs may be edited in any state except `Analyzing`; editing after a
//! finished run starts a fresh draft from the same inputs. A run can only be
//! requested once a resume and a non-blank job description are present.

use crate::formatting::{format_narrative, format_resume};
use crate::parsing::{assemble, split_response, LlmResponse, ParsedAnalysis};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A resume whose text has already been extracted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeSource {
    pub name: String,
    pub text: String,
}

/// Inputs gathered before a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub resume: Option<ResumeSource>,
    pub job_description: String,
    pub model: String,
}

impl Draft {
    pub fn is_complete(&self) -> bool {
        self.resume.is_some() && !self.job_description.trim().is_empty() && !self.model.trim().is_empty()
    }
}

/// Everything produced by one successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisOutcome {
    pub response: LlmResponse,
    pub analysis: ParsedAnalysis,
    pub narrative_markup: String,
    /// `None` when the reply carried no rewritten resume.
    pub resume_markup: Option<String>,
}

impl AnalysisOutcome {
    /// Split, assemble and format a raw reply.
    pub fn from_reply(raw: &str) -> Self {
        Self::from_response(split_response(raw))
    }

    /// Build from an analysis and a rewritten resume that arrived separately.
    pub fn from_parts(analysis: &str, improved_resume: &str) -> Self {
        Self::from_response(LlmResponse {
            analysis: analysis.replace("\r\n", "\n").trim().to_string(),
            improved_resume: improved_resume.replace("\r\n", "\n").trim().to_string(),
        })
    }

    fn from_response(response: LlmResponse) -> Self {
        let analysis = assemble(&response.analysis);
        let narrative_markup = format_narrative(&response.analysis);
        let resume_markup = response
            .has_improved_resume()
            .then(|| format_resume(&response.improved_resume));

        AnalysisOutcome {
            response,
            analysis,
            narrative_markup,
            resume_markup,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Ready { draft: Draft },
    Analyzing { draft: Draft },
    Complete { draft: Draft, outcome: AnalysisOutcome },
    Failed { draft: Draft, message: String },
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Ready { .. } => "ready",
            SessionState::Analyzing { .. } => "analyzing",
            SessionState::Complete { .. } => "complete",
            SessionState::Failed { .. } => "failed",
        }
    }

    pub fn draft(&self) -> Option<&Draft> {
        match self {
            SessionState::Idle => None,
            SessionState::Ready { draft }
            | SessionState::Analyzing { draft }
            | SessionState::Complete { draft, .. }
            | SessionState::Failed { draft, .. } => Some(draft),
        }
    }

    pub fn outcome(&self) -> Option<&AnalysisOutcome> {
        match self {
            SessionState::Complete { outcome, .. } => Some(outcome),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    FileSelected(ResumeSource),
    JobDescriptionEntered(String),
    ModelSelected(String),
    AnalysisRequested,
    AnalysisSucceeded(String),
    AnalysisFailed(String),
    Reset,
}

impl SessionEvent {
    fn name(&self) -> &'static str {
        match self {
            SessionEvent::FileSelected(_) => "select a file",
            SessionEvent::JobDescriptionEntered(_) => "enter a job description",
            SessionEvent::ModelSelected(_) => "select a model",
            SessionEvent::AnalysisRequested => "request an analysis",
            SessionEvent::AnalysisSucceeded(_) => "complete an analysis",
            SessionEvent::AnalysisFailed(_) => "fail an analysis",
            SessionEvent::Reset => "reset",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("cannot {event} while {state}")]
    Illegal { state: &'static str, event: &'static str },

    #[error("Missing resume, job description, or LLM")]
    Incomplete,
}

#[derive(Debug)]
pub struct Session {
    state: SessionState,
    default_model: String,
}

impl Session {
    pub fn new(default_model: impl Into<String>) -> Self {
        Self {
            state: SessionState::Idle,
            default_model: default_model.into(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Apply one event. A rejected event leaves the state untouched.
    pub fn apply(&mut self, event: SessionEvent) -> Result<&SessionState, TransitionError> {
        let next = self.next_state(event)?;
        if next.name() != self.state.name() {
            info!("Session {} -> {}", self.state.name(), next.name());
        }
        self.state = next;
        Ok(&self.state)
    }

    fn next_state(&self, event: SessionEvent) -> Result<SessionState, TransitionError> {
        let illegal = |event: &SessionEvent| TransitionError::Illegal {
            state: self.state.name(),
            event: event.name(),
        };

        match event {
            SessionEvent::Reset => Ok(SessionState::Idle),

            SessionEvent::FileSelected(_) | SessionEvent::JobDescriptionEntered(_) | SessionEvent::ModelSelected(_) => {
                if matches!(self.state, SessionState::Analyzing { .. }) {
                    return Err(illegal(&event));
                }
                let mut draft = self.state.draft().cloned().unwrap_or_else(|| Draft {
                    model: self.default_model.clone(),
                    ..Draft::default()
                });
                match event {
                    SessionEvent::FileSelected(resume) => {
                        debug!("Resume selected: {}", resume.name);
                        draft.resume = Some(resume);
                    }
                    SessionEvent::JobDescriptionEntered(job) => draft.job_description = job,
                    SessionEvent::ModelSelected(model) => draft.model = model,
                    _ => {}
                }
                Ok(SessionState::Ready { draft })
            }

            SessionEvent::AnalysisRequested => match &self.state {
                SessionState::Ready { draft } | SessionState::Failed { draft, .. } => {
                    if !draft.is_complete() {
                        return Err(TransitionError::Incomplete);
                    }
                    Ok(SessionState::Analyzing { draft: draft.clone() })
                }
                SessionState::Idle => Err(TransitionError::Incomplete),
                _ => Err(illegal(&event)),
            },

            SessionEvent::AnalysisSucceeded(ref raw) => match &self.state {
                SessionState::Analyzing { draft } => Ok(SessionState::Complete {
                    draft: draft.clone(),
                    outcome: AnalysisOutcome::from_reply(raw),
                }),
                _ => Err(illegal(&event)),
            },

            SessionEvent::AnalysisFailed(ref message) => match &self.state {
                SessionState::Analyzing { draft } => {
                    warn!("Analysis failed: {}", message);
                    Ok(SessionState::Failed {
                        draft: draft.clone(),
                        message: message.clone(),
                    })
                }
                _ => Err(illegal(&event)),
            },
        }
    }
}
