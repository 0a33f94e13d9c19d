//! Runs one resume/job match through the LLM and the session lifecycle

use crate::config::Config;
use crate::error::{AtsMatchError, Result};
use crate::input::InputManager;
use crate::llm::client::OpenRouterClient;
use crate::llm::models::{ModelCatalog, ModelInfo};
use crate::llm::prompts::{PromptParams, PromptTemplates};
use crate::llm::request::MatchRequest;
use crate::session::{AnalysisOutcome, Draft, ResumeSource, Session, SessionEvent, SessionState};
use log::info;
use std::path::Path;

pub struct AtsAnalyzer {
    input: InputManager,
    client: OpenRouterClient,
    catalog: ModelCatalog,
    templates: PromptTemplates,
    default_model: String,
}

impl AtsAnalyzer {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self::with_client(config, OpenRouterClient::new(&config.llm)?))
    }

    pub fn with_client(config: &Config, client: OpenRouterClient) -> Self {
        Self {
            input: InputManager::new(),
            client,
            catalog: ModelCatalog::new(),
            templates: PromptTemplates::default(),
            default_model: config.llm.default_model.clone(),
        }
    }

    pub async fn load_resume(&mut self, path: &Path) -> Result<ResumeSource> {
        let text = self.input.extract_text(path).await?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(ResumeSource { name, text })
    }

    /// Resolve the model and render the prompt for a complete draft.
    pub fn prepare(&self, draft: &Draft) -> Result<(&ModelInfo, String)> {
        let resume = draft
            .resume
            .as_ref()
            .ok_or_else(|| AtsMatchError::InvalidInput("Missing resume, job description, or LLM".to_string()))?;
        let model = self.catalog.resolve(&draft.model);
        let prompt = self.templates.render_ats_prompt(&PromptParams {
            resume_content: resume.text.clone(),
            job_content: draft.job_description.clone(),
        });
        Ok((model, prompt))
    }

    /// Validate, extract, query the model and assemble the outcome.
    pub async fn analyze(&mut self, request: &MatchRequest) -> Result<AnalysisOutcome> {
        request.validate()?;

        let mut session = Session::new(self.default_model.clone());
        let resume = self.load_resume(&request.resume_path).await?;
        session.apply(SessionEvent::FileSelected(resume))?;
        session.apply(SessionEvent::JobDescriptionEntered(request.job_description.clone()))?;
        session.apply(SessionEvent::ModelSelected(request.model.clone()))?;

        let draft = match session.apply(SessionEvent::AnalysisRequested)? {
            SessionState::Analyzing { draft } => draft.clone(),
            other => {
                return Err(AtsMatchError::AnalysisFailed(format!(
                    "Unexpected session state: {}",
                    other.name()
                )))
            }
        };

        let (model, prompt) = self.prepare(&draft)?;
        info!("Analyzing {} with {}", request.resume_path.display(), model.display_name);

        match self.client.complete(&model.slug, &prompt).await {
            Ok(reply) => {
                session.apply(SessionEvent::AnalysisSucceeded(reply))?;
            }
            Err(err) => {
                session.apply(SessionEvent::AnalysisFailed(err.to_string()))?;
                return Err(err);
            }
        }

        session
            .state()
            .outcome()
            .cloned()
            .ok_or_else(|| AtsMatchError::AnalysisFailed("Session finished without an outcome".to_string()))
    }
}
