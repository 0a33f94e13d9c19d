//! LLM integration: prompt, model catalog and the OpenRouter client

pub mod analyzer;
pub mod client;
pub mod models;
pub mod prompts;
pub mod request;

pub use analyzer::AtsAnalyzer;
pub use client::OpenRouterClient;
pub use models::ModelCatalog;
pub use request::MatchRequest;
