//! ATS matcher library
//!
//! Parses free-text LLM replies to an ATS prompt into structured analysis
//! data and renders the analysis and the rewritten resume as HTML.

pub mod cli;
pub mod config;
pub mod error;
pub mod formatting;
pub mod input;
pub mod llm;
pub mod output;
pub mod parsing;
pub mod session;

pub use config::Config;
pub use error::{AtsMatchError, Result};
pub use formatting::{format_narrative, format_resume};
pub use parsing::{assemble, split_response, LlmResponse, ParsedAnalysis};
pub use session::{AnalysisOutcome, Session, SessionEvent, SessionState};
