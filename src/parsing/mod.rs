//! Turning free-text LLM replies into structured analysis data

pub mod grammar;
pub mod sections;
pub mod lists;
pub mod scores;
pub mod analysis;
pub mod response;

pub use analysis::{assemble, ParsedAnalysis};
pub use response::{split_response, LlmResponse};
